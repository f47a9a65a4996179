use thiserror::Error;

/// Raised when a geometry computation is asked for an axis that does not exist.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("unknown axis tag {0:?}, expected 'W' or 'H'")]
    UnknownAxis(char),
}

/// Invalid image-space frame.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BoundingBoxError {
    #[error("left > right ({left} > {right})")]
    LeftAfterRight { left: f64, right: f64 },

    #[error("top > bottom ({top} > {bottom})")]
    TopBelowBottom { top: f64, bottom: f64 },

    #[error("component {0} is negative or not finite")]
    InvalidComponent(f64),

    #[error("expected 4 coordinates, found {0}")]
    ComponentCount(usize),

    #[error("coordinate {0:?} is not a number")]
    NotANumber(String),
}

/// A single detector record that could not be decoded.
///
/// Carries the position of the record in the detector's response so the
/// caller can drop exactly that object.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("malformed detection #{index}: {reason}")]
pub struct MalformedDetection {
    pub index: usize,
    pub reason: String,
}

/// Failure reported by the external detector.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("detector error [{code}]: {message}")]
pub struct EngineError {
    pub code: String,
    pub message: String,
}

impl EngineError {
    pub const NO_OBJECTS: &'static str = "ObjectError";
    pub const NO_LABEL: &'static str = "NoLabel";

    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn no_objects() -> Self {
        Self::new(Self::NO_OBJECTS, "No Objects Detected")
    }

    pub fn no_label() -> Self {
        Self::new(Self::NO_LABEL, "No Label Found")
    }
}

#[cfg(feature = "onnx")]
impl From<ort::Error> for EngineError {
    fn from(err: ort::Error) -> Self {
        EngineError::new("InferenceError", err.to_string())
    }
}

impl From<image::ImageError> for EngineError {
    fn from(err: image::ImageError) -> Self {
        EngineError::new("ImageDecode", err.to_string())
    }
}

/// The one outcome callers see when a detection run produced nothing to show.
///
/// `reason` keeps the underlying cause for diagnostics; the user-facing text
/// is always [`DetectionFailure::USER_MESSAGE`].
#[derive(Debug, Clone, PartialEq, Error)]
#[error("no object detected ({reason})")]
pub struct DetectionFailure {
    pub reason: String,
    pub elapsed_seconds: f64,
}

impl DetectionFailure {
    pub const USER_MESSAGE: &'static str = "No Object Detected";
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("viewport dimensions must be positive, got {width}x{height}")]
    InvalidViewport { width: f64, height: f64 },

    #[error("{key} must be within [0, 1], got {value}")]
    OutOfUnitRange { key: &'static str, value: f64 },

    #[error("MAX_LABELS_PER_OBJECT must be at least 1")]
    ZeroLabelCount,
}

/// Failure loading captured detector responses.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("failed to read recorded responses: {0}")]
    Io(#[from] std::io::Error),

    #[error("recorded responses are not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
