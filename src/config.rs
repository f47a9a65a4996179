//! Environment-based configuration.

use crate::error::ConfigError;
use crate::geometry::layout::Viewport;
use crate::object_detection::boundary::LabelPolicy;
use std::path::PathBuf;

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub viewport: Viewport,
    pub model_path: PathBuf,
    pub classes_path: PathBuf,
    pub label_policy: LabelPolicy,
    pub nms_iou_threshold: f64,
    pub overlay_output: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup; absent or unparsable values fall back
    /// to their defaults, parsed values are validated.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let parsed = |key: &str| lookup(key).and_then(|v| v.trim().parse::<f64>().ok());

        let viewport = Viewport::new(
            parsed("VIEWPORT_WIDTH").unwrap_or(1080.0),
            parsed("VIEWPORT_HEIGHT").unwrap_or(2000.0),
        )?;

        let confidence_threshold = parsed("CLASSIFICATION_CONFIDENCE_THRESHOLD").unwrap_or(0.5);
        if !(0.0..=1.0).contains(&confidence_threshold) {
            return Err(ConfigError::OutOfUnitRange {
                key: "CLASSIFICATION_CONFIDENCE_THRESHOLD",
                value: confidence_threshold,
            });
        }
        let nms_iou_threshold = parsed("NMS_IOU_THRESHOLD").unwrap_or(0.5);
        if !(0.0..=1.0).contains(&nms_iou_threshold) {
            return Err(ConfigError::OutOfUnitRange {
                key: "NMS_IOU_THRESHOLD",
                value: nms_iou_threshold,
            });
        }
        let max_labels_per_object = lookup("MAX_LABELS_PER_OBJECT")
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(3);
        if max_labels_per_object == 0 {
            return Err(ConfigError::ZeroLabelCount);
        }

        let path = |key: &str, default: &str| {
            PathBuf::from(lookup(key).unwrap_or_else(|| default.to_string()))
        };

        Ok(Self {
            viewport,
            model_path: path("MODEL_PATH", "./data/models/model.onnx"),
            classes_path: path("CLASSES_PATH", "./data/model_metadata/classes.txt"),
            label_policy: LabelPolicy {
                confidence_threshold: confidence_threshold as f32,
                max_labels_per_object,
            },
            nms_iou_threshold,
            overlay_output: path("OVERLAY_OUTPUT", "overlay.png"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = config(&[]).unwrap();
        assert_eq!(config.viewport, Viewport::new(1080.0, 2000.0).unwrap());
        assert_eq!(config.label_policy, LabelPolicy::default());
        assert_eq!(config.nms_iou_threshold, 0.5);
        assert_eq!(config.model_path, PathBuf::from("./data/models/model.onnx"));
        assert_eq!(config.overlay_output, PathBuf::from("overlay.png"));
    }

    #[test]
    fn reads_overrides() {
        let config = config(&[
            ("VIEWPORT_WIDTH", "390"),
            ("VIEWPORT_HEIGHT", " 844.5 "),
            ("CLASSIFICATION_CONFIDENCE_THRESHOLD", "0.8"),
            ("MAX_LABELS_PER_OBJECT", "1"),
            ("MODEL_PATH", "/models/food.onnx"),
        ])
        .unwrap();
        assert_eq!(config.viewport.width(), 390.0);
        assert_eq!(config.viewport.height(), 844.5);
        assert_eq!(config.label_policy.confidence_threshold, 0.8);
        assert_eq!(config.label_policy.max_labels_per_object, 1);
        assert_eq!(config.model_path, PathBuf::from("/models/food.onnx"));
    }

    #[test]
    fn unparsable_values_fall_back_to_defaults() {
        let config =
            config(&[("VIEWPORT_WIDTH", "wide"), ("MAX_LABELS_PER_OBJECT", "-2")]).unwrap();
        assert_eq!(config.viewport.width(), 1080.0);
        assert_eq!(config.label_policy.max_labels_per_object, 3);
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(matches!(
            config(&[("VIEWPORT_HEIGHT", "0")]),
            Err(ConfigError::InvalidViewport { .. })
        ));
        assert!(matches!(
            config(&[("CLASSIFICATION_CONFIDENCE_THRESHOLD", "1.2")]),
            Err(ConfigError::OutOfUnitRange { .. })
        ));
        assert_eq!(
            config(&[("MAX_LABELS_PER_OBJECT", "0")]),
            Err(ConfigError::ZeroLabelCount)
        );
    }
}
