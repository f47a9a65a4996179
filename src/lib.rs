//! Maps on-device object detections onto the letterboxed photo preview.
//!
//! A detector reports boxes in the pixels of the original photo. The photo is shown fitted
//! into the viewport, so every box is rescaled into display space before it is drawn.
//! [`presentation::session::DetectionSession`] ties one detector call, the layout and the
//! mapping together into the state a UI renders.

pub mod annotations;
pub mod config;
pub mod error;
pub mod geometry;
pub mod image_utils;
pub mod object_detection;
pub mod presentation;
