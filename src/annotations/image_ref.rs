use image::ImageResult;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Handle to a photo handed over by image acquisition.
///
/// Dimensions are always at least 1: acquisition may report a missing or zero size, which is
/// replaced by 1 so that later scaling never divides by zero. That fallback is policy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ImageRef {
    uri: String,
    width: u32,
    height: u32,
}

impl ImageRef {
    pub fn new(uri: impl Into<String>, width: u32, height: u32) -> Self {
        Self::from_acquisition(uri, Some(width), Some(height))
    }

    pub fn from_acquisition(
        uri: impl Into<String>,
        width: Option<u32>,
        height: Option<u32>,
    ) -> Self {
        let fallback = |v: Option<u32>| v.filter(|v| *v > 0).unwrap_or(1);
        Self {
            uri: uri.into(),
            width: fallback(width),
            height: fallback(height),
        }
    }

    /// Reads the pixel dimensions from the image header without decoding pixels.
    pub fn from_path(path: &Path) -> ImageResult<Self> {
        let (width, height) = image::image_dimensions(path)?;
        Ok(Self::new(path.to_string_lossy(), width, height))
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Filesystem path behind a `file://` URI or a bare path.
    pub fn local_path(&self) -> PathBuf {
        PathBuf::from(self.uri.strip_prefix("file://").unwrap_or(&self.uri))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}
