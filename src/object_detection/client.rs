use crate::annotations::detection::DetectedObject;
use crate::annotations::image_ref::ImageRef;
use crate::error::DetectionFailure;
use crate::object_detection::boundary::decode_records;
use crate::object_detection::object_detection_model::ObjectDetectionModel;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Objects found in one detection run, with the wall-clock cost of the detector call.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DetectionResult {
    pub objects: Vec<DetectedObject>,
    pub elapsed_seconds: f64,
}

/// Invokes the detector once per call and folds every failure into [`DetectionFailure`].
///
/// No retries and no timeout: a hung detector hangs the call.
#[derive(Clone)]
pub struct DetectionClient {
    model: Arc<dyn ObjectDetectionModel>,
}

impl DetectionClient {
    pub fn new(model: impl ObjectDetectionModel + 'static) -> Self {
        Self {
            model: Arc::new(model),
        }
    }

    pub async fn detect(&self, image: &ImageRef) -> Result<DetectionResult, DetectionFailure> {
        let model = Arc::clone(&self.model);
        let request = image.clone();

        let start = Instant::now();
        let outcome = tokio::task::spawn_blocking(move || model.detect(&request)).await;
        let elapsed_seconds = start.elapsed().as_secs_f64();

        let failure = |reason: String| {
            warn!(uri = image.uri(), %reason, elapsed_seconds, "detection failed");
            DetectionFailure {
                reason,
                elapsed_seconds,
            }
        };

        let records = match outcome {
            Ok(Ok(records)) => records,
            Ok(Err(err)) => return Err(failure(err.to_string())),
            Err(join_err) => return Err(failure(format!("detector task aborted: {join_err}"))),
        };

        let objects = decode_records(&records);
        if objects.is_empty() {
            return Err(failure(format!(
                "none of the {} returned records could be decoded",
                records.len()
            )));
        }
        debug!(
            uri = image.uri(),
            objects = objects.len(),
            elapsed_seconds,
            "detection finished"
        );
        Ok(DetectionResult {
            objects,
            elapsed_seconds,
        })
    }
}
