use crate::error::BoundingBoxError;
use itertools::Itertools;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// A struct representing a detected object's frame in image space.
///
/// Detectors report the smallest rectangle that contains the object, in pixels of the
/// original, unscaled photo. This project uses the standard convention of the left side of
/// the image being x=0 and the top of the image being y=0.
///
/// At the detector boundary a frame travels as a single string of four space separated
/// numbers, `"left top right bottom"`. It is decoded once into this struct; everything
/// downstream works with the named edges.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct BoundingBox {
    left: f64,
    top: f64,
    right: f64,
    bottom: f64,
}

impl BoundingBox {
    /// Checks if a box has valid parameters before constructing.
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Result<Self, BoundingBoxError> {
        for component in [left, top, right, bottom] {
            if !component.is_finite() || component < 0.0 {
                return Err(BoundingBoxError::InvalidComponent(component));
            }
        }
        if left > right {
            Err(BoundingBoxError::LeftAfterRight { left, right })
        } else if top > bottom {
            Err(BoundingBoxError::TopBelowBottom { top, bottom })
        } else {
            Ok(BoundingBox {
                left,
                top,
                right,
                bottom,
            })
        }
    }
}

impl FromStr for BoundingBox {
    type Err = BoundingBoxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let components: Vec<f64> = s
            .split_whitespace()
            .map(|part| {
                part.parse::<f64>()
                    .map_err(|_| BoundingBoxError::NotANumber(part.to_string()))
            })
            .collect::<Result<_, _>>()?;
        let count = components.len();
        let (left, top, right, bottom) = components
            .into_iter()
            .collect_tuple()
            .ok_or(BoundingBoxError::ComponentCount(count))?;
        BoundingBox::new(left, top, right, bottom)
    }
}

/// Wire form, `"left top right bottom"`.
impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.left, self.top, self.right, self.bottom)
    }
}

/// Shared rectangle geometry for image-space frames and display-space overlays.
pub trait BoundingBoxGeometry {
    fn left(&self) -> f64;
    fn top(&self) -> f64;
    fn right(&self) -> f64;
    fn bottom(&self) -> f64;

    fn width(&self) -> f64 {
        self.right() - self.left()
    }

    fn height(&self) -> f64 {
        self.bottom() - self.top()
    }

    fn area(&self) -> f64 {
        self.width() * self.height()
    }

    fn center(&self) -> (f64, f64) {
        (
            (self.left() + self.right()) / 2.0,
            (self.top() + self.bottom()) / 2.0,
        )
    }

    fn as_xyxy(&self) -> (f64, f64, f64, f64) {
        (self.left(), self.top(), self.right(), self.bottom())
    }

    /// Area of overlap divided by area of union. Zero when either box is empty.
    fn intersection_over_union(&self, other: &impl BoundingBoxGeometry) -> f64 {
        let overlap_w = (self.right().min(other.right()) - self.left().max(other.left())).max(0.0);
        let overlap_h = (self.bottom().min(other.bottom()) - self.top().max(other.top())).max(0.0);
        let intersection = overlap_w * overlap_h;
        let union = self.area() + other.area() - intersection;
        if union <= 0.0 {
            return 0.0;
        }
        intersection / union
    }
}

impl BoundingBoxGeometry for BoundingBox {
    fn left(&self) -> f64 {
        self.left
    }

    fn top(&self) -> f64 {
        self.top
    }

    fn right(&self) -> f64 {
        self.right
    }

    fn bottom(&self) -> f64 {
        self.bottom
    }
}
