use crate::annotations::image_ref::ImageRef;
use crate::error::EngineError;
use crate::object_detection::boundary::DetectorRecord;

/// Defines a trait that all object detection backends must follow.
///
/// A backend is a black box: given a reference to a photo it returns one record per object
/// it found, in its own order, or an error with a machine code and a human message. An empty
/// result is reported as an error by the backend itself, never as `Ok(vec![])`.
///
/// Calls are blocking; [`crate::object_detection::client::DetectionClient`] moves them off
/// the async runtime.
pub trait ObjectDetectionModel: Send + Sync {
    fn detect(&self, image: &ImageRef) -> Result<Vec<DetectorRecord>, EngineError>;
}
