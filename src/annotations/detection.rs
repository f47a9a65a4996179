use crate::annotations::bounding_box::{BoundingBox, BoundingBoxGeometry};
use serde::Serialize;

/// A detection is what is produced as output from an object detection model.
///
/// A detection is any annotation combined with the best label the detector found for it and
/// that label's confidence score. The label is absent when no candidate cleared the
/// detector's confidence floor.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Detection<T: BoundingBoxGeometry> {
    pub annotation: T,
    pub label: Option<String>,
    pub confidence: f64,
}

/// One object from a single detection run, framed in image space.
pub type DetectedObject = Detection<BoundingBox>;
