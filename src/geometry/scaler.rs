//! Linear mapping of a single coordinate from image space into display space.

use crate::annotations::image_ref::ImageRef;
use crate::error::GeometryError;
use crate::geometry::layout::DisplayBox;

/// The scaling dimension a coordinate belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    /// Width-based scaling, tag `'W'`.
    Horizontal,
    /// Height-based scaling, tag `'H'`.
    Vertical,
}

impl TryFrom<char> for Axis {
    type Error = GeometryError;

    fn try_from(tag: char) -> Result<Self, Self::Error> {
        match tag {
            'W' => Ok(Axis::Horizontal),
            'H' => Ok(Axis::Vertical),
            other => Err(GeometryError::UnknownAxis(other)),
        }
    }
}

impl Axis {
    /// Source and target extents this axis scales between.
    pub fn extents(self, image: &ImageRef, display: &DisplayBox) -> (f64, f64) {
        match self {
            Axis::Horizontal => (f64::from(image.width()), display.width),
            Axis::Vertical => (f64::from(image.height()), display.height),
        }
    }
}

/// Maps `box_extent` from a source of size `source_extent` onto a target of size
/// `target_extent`, then shifts by `offset`.
///
/// The scaled value is rounded up so an overlay never under-covers the detected region.
/// A source smaller than one pixel is treated as unknown and yields 0.
pub fn scale(source_extent: f64, box_extent: f64, target_extent: f64, offset: f64) -> f64 {
    if source_extent < 1.0 {
        return 0.0;
    }
    (box_extent * (target_extent / source_extent)).ceil() + offset
}

/// [`scale`] with the extents selected by `axis`, no offset.
pub fn scale_along(axis: Axis, image: &ImageRef, display: &DisplayBox, box_extent: f64) -> f64 {
    let (source, target) = axis.extents(image, display);
    scale(source, box_extent, target, 0.0)
}

/// [`scale_along`] for callers that carry the axis as its one-letter tag.
pub fn scale_tagged(
    tag: char,
    image: &ImageRef,
    display: &DisplayBox,
    box_extent: f64,
) -> Result<f64, GeometryError> {
    Ok(scale_along(Axis::try_from(tag)?, image, display, box_extent))
}
