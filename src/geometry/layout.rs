//! Fitting a photo into the on-screen viewport.

use crate::error::ConfigError;
use serde::Serialize;

/// Fraction of the viewport height an image may occupy.
const MAX_HEIGHT_FRACTION: f64 = 0.5;

/// Screen area available to the preview, in display pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Viewport {
    width: f64,
    height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Result<Self, ConfigError> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(ConfigError::InvalidViewport { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }
}

/// Footprint of the rendered image inside the viewport.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct DisplayBox {
    pub width: f64,
    pub height: f64,
}

/// Fits an image into the full viewport width and half the viewport height, keeping its
/// aspect ratio.
///
/// Images that would be taller than half the viewport at full width are capped to that
/// height and narrowed accordingly. Zero dimensions are read as 1.
pub fn compute_display_box(image_width: u32, image_height: u32, viewport: &Viewport) -> DisplayBox {
    let image_width = f64::from(image_width.max(1));
    let image_height = f64::from(image_height.max(1));
    let max_height = MAX_HEIGHT_FRACTION * viewport.height;

    let natural_height = viewport.width * image_height / image_width;
    if natural_height > max_height {
        DisplayBox {
            height: max_height,
            width: viewport.width * viewport.height * MAX_HEIGHT_FRACTION / natural_height,
        }
    } else {
        DisplayBox {
            height: natural_height,
            width: viewport.width,
        }
    }
}
