use crate::annotations::image_ref::ImageRef;
use crate::error::{EngineError, ReplayError};
use crate::object_detection::boundary::DetectorRecord;
use crate::object_detection::object_detection_model::ObjectDetectionModel;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

/// Serves detector responses captured earlier, keyed by image URI.
///
/// The JSON document is an object mapping each URI to the list of records the detector
/// returned for it.
#[derive(Clone, Debug, Default)]
pub struct RecordedDetector {
    responses: HashMap<String, Vec<DetectorRecord>>,
}

impl RecordedDetector {
    pub fn new(responses: HashMap<String, Vec<DetectorRecord>>) -> Self {
        Self { responses }
    }

    pub fn from_json_str(json: &str) -> Result<Self, ReplayError> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    pub fn from_path(path: &Path) -> Result<Self, ReplayError> {
        let reader = BufReader::new(File::open(path)?);
        Ok(Self::new(serde_json::from_reader(reader)?))
    }
}

impl ObjectDetectionModel for RecordedDetector {
    fn detect(&self, image: &ImageRef) -> Result<Vec<DetectorRecord>, EngineError> {
        match self.responses.get(image.uri()) {
            Some(records) if !records.is_empty() => {
                debug!(uri = image.uri(), count = records.len(), "replaying detector response");
                Ok(records.clone())
            }
            _ => Err(EngineError::no_objects()),
        }
    }
}
