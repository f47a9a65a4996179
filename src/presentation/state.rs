use crate::annotations::image_ref::ImageRef;
use crate::geometry::layout::{DisplayBox, Viewport, compute_display_box};
use crate::geometry::mapper::{DisplayRectangle, map_to_display_rectangles};
use crate::object_detection::client::DetectionResult;
use serde::Serialize;

/// Everything the UI needs to draw one detection run.
///
/// Built in one piece from a single image and the objects detected in it, so the
/// rectangles always belong to `current_image` and `display_box`. Never patched in place.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PresentationState {
    pub current_image: Option<ImageRef>,
    pub display_box: DisplayBox,
    pub detections: Vec<DisplayRectangle>,
    pub latency_seconds: f64,
}

impl PresentationState {
    pub fn from_detection(image: ImageRef, result: &DetectionResult, viewport: &Viewport) -> Self {
        let display_box = compute_display_box(image.width(), image.height(), viewport);
        let detections = map_to_display_rectangles(&result.objects, &image, &display_box);
        Self {
            current_image: Some(image),
            display_box,
            detections,
            latency_seconds: result.elapsed_seconds,
        }
    }

    /// State shown after a failed run: nothing displayed, latency of the failed attempt.
    pub fn cleared(latency_seconds: f64) -> Self {
        Self {
            latency_seconds,
            ..Self::default()
        }
    }
}
