//! Image-space detections to display-space overlay rectangles.

use crate::annotations::bounding_box::{BoundingBox, BoundingBoxGeometry};
use crate::annotations::detection::DetectedObject;
use crate::annotations::image_ref::ImageRef;
use crate::geometry::layout::DisplayBox;
use crate::geometry::scaler::{Axis, scale_along};
use serde::Serialize;

/// One overlay box, offset from the top-left corner of the [`DisplayBox`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct DisplayRectangle {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBoxGeometry for DisplayRectangle {
    fn left(&self) -> f64 {
        self.left
    }

    fn top(&self) -> f64 {
        self.top
    }

    fn right(&self) -> f64 {
        self.left + self.width
    }

    fn bottom(&self) -> f64 {
        self.top + self.height
    }

    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }
}

/// Scales each edge of `frame` along its own axis; every edge is rounded up independently.
pub fn map_frame(frame: &BoundingBox, image: &ImageRef, display: &DisplayBox) -> DisplayRectangle {
    let left = scale_along(Axis::Horizontal, image, display, frame.left());
    let right = scale_along(Axis::Horizontal, image, display, frame.right());
    let top = scale_along(Axis::Vertical, image, display, frame.top());
    let bottom = scale_along(Axis::Vertical, image, display, frame.bottom());
    DisplayRectangle {
        top,
        left,
        width: right - left,
        height: bottom - top,
    }
}

/// One rectangle per object, in the detector's order.
pub fn map_to_display_rectangles(
    objects: &[DetectedObject],
    image: &ImageRef,
    display: &DisplayBox,
) -> Vec<DisplayRectangle> {
    objects
        .iter()
        .map(|object| map_frame(&object.annotation, image, display))
        .collect()
}
