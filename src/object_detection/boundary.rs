//! The record shape exchanged with the external detector, and its decoding.
//!
//! Field names on the wire are kept exactly as the detector module emits them, including the
//! misspelled `lable` and `cordinates`.

use crate::annotations::bounding_box::{BoundingBox, BoundingBoxGeometry};
use crate::annotations::detection::DetectedObject;
use crate::error::{EngineError, MalformedDetection};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetectorRecord {
    #[serde(
        rename = "lable",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub label: Option<String>,
    #[serde(default, deserialize_with = "required_text")]
    pub confidence: String,
    /// Informational; overlays derive their size from `coordinates`.
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub width: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub height: Option<String>,
    /// `"left top right bottom"` in image-space pixels.
    #[serde(rename = "cordinates", default, deserialize_with = "required_text")]
    pub coordinates: String,
}

/// Accepts any JSON value as text, so a missing or badly typed field only fails
/// [`DetectorRecord::decode`] for its own record instead of the whole response.
fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    })
}

fn required_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(lenient_text(deserializer)?.unwrap_or_default())
}

impl DetectorRecord {
    /// Decodes the record at position `index` of a detector response.
    pub fn decode(&self, index: usize) -> Result<DetectedObject, MalformedDetection> {
        let malformed = |reason: String| MalformedDetection { index, reason };
        let annotation: BoundingBox = self
            .coordinates
            .parse()
            .map_err(|e| malformed(format!("coordinates {:?}: {e}", self.coordinates)))?;
        let confidence: f64 = self
            .confidence
            .trim()
            .parse()
            .map_err(|_| malformed(format!("confidence {:?} is not a number", self.confidence)))?;
        if !(0.0..=1.0).contains(&confidence) {
            return Err(malformed(format!("confidence {confidence} outside [0, 1]")));
        }
        Ok(DetectedObject {
            annotation,
            label: self.label.clone(),
            confidence,
        })
    }

    /// Builds the wire record for one engine object.
    ///
    /// Only candidates at or above the policy's confidence threshold count, at most
    /// `max_labels_per_object` of them; the best is the one with the strictly highest
    /// confidence, earlier candidates winning ties.
    pub fn from_engine_object(object: &EngineObject, policy: &LabelPolicy) -> Self {
        let best = policy
            .retained_labels(&object.labels)
            .into_iter()
            .next()
            .filter(|l| l.confidence > 0.0);
        DetectorRecord {
            label: best.map(|l| l.text.clone()),
            confidence: best.map_or_else(|| "0".to_string(), |l| l.confidence.to_string()),
            width: Some(object.frame.width().to_string()),
            height: Some(object.frame.height().to_string()),
            coordinates: object.frame.to_string(),
        }
    }
}

/// Decodes a full response, dropping malformed records with a warning.
pub fn decode_records(records: &[DetectorRecord]) -> Vec<DetectedObject> {
    records
        .iter()
        .enumerate()
        .filter_map(|(index, record)| match record.decode(index) {
            Ok(object) => Some(object),
            Err(err) => {
                warn!(%err, "dropping malformed detection");
                None
            }
        })
        .collect()
}

/// Decodes a full response, failing on the first malformed record.
pub fn try_decode_records(
    records: &[DetectorRecord],
) -> Result<Vec<DetectedObject>, MalformedDetection> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| record.decode(index))
        .collect()
}

/// A classification candidate attached to an engine object.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelCandidate {
    pub text: String,
    pub index: usize,
    pub confidence: f32,
}

/// An object as the inference engine reports it, before it is flattened into a record.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineObject {
    pub frame: BoundingBox,
    pub labels: Vec<LabelCandidate>,
}

/// Classification options applied when building records.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabelPolicy {
    pub confidence_threshold: f32,
    pub max_labels_per_object: usize,
}

impl Default for LabelPolicy {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.5,
            max_labels_per_object: 3,
        }
    }
}

impl LabelPolicy {
    /// Highest confidence first; the sort is stable so ties keep engine order.
    fn retained_labels<'a>(&self, labels: &'a [LabelCandidate]) -> Vec<&'a LabelCandidate> {
        let mut retained: Vec<&LabelCandidate> = labels
            .iter()
            .filter(|l| l.confidence >= self.confidence_threshold)
            .collect();
        retained.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        retained.truncate(self.max_labels_per_object);
        retained
    }
}

/// Flattens an engine run into boundary records.
///
/// Fails when the engine found nothing, or when none of the objects carries a label.
pub fn records_from_engine_objects(
    objects: &[EngineObject],
    policy: &LabelPolicy,
) -> Result<Vec<DetectorRecord>, EngineError> {
    if objects.is_empty() {
        return Err(EngineError::no_objects());
    }
    let records: Vec<DetectorRecord> = objects
        .iter()
        .map(|object| DetectorRecord::from_engine_object(object, policy))
        .collect();
    if records.iter().all(|r| r.label.is_none()) {
        return Err(EngineError::no_label());
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(coordinates: &str, confidence: &str) -> DetectorRecord {
        DetectorRecord {
            label: Some("dog".to_string()),
            confidence: confidence.to_string(),
            width: None,
            height: None,
            coordinates: coordinates.to_string(),
        }
    }

    fn candidate(text: &str, index: usize, confidence: f32) -> LabelCandidate {
        LabelCandidate {
            text: text.to_string(),
            index,
            confidence,
        }
    }

    #[test]
    fn deserializes_wire_field_names() {
        let json = r#"[
            {"lable": "Food", "confidence": "0.91", "width": "100", "height": "200",
             "cordinates": "50 100 150 300"},
            {"confidence": "0.0", "width": "10", "height": "10", "cordinates": "0 0 10 10"}
        ]"#;
        let records: Vec<DetectorRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(records[0].label.as_deref(), Some("Food"));
        assert_eq!(records[1].label, None);

        let objects = try_decode_records(&records).unwrap();
        assert_eq!(objects[0].annotation, BoundingBox::new(50.0, 100.0, 150.0, 300.0).unwrap());
        assert_eq!(objects[0].confidence, 0.91);
        assert_eq!(objects[1].label, None);
    }

    #[test]
    fn serializes_back_to_wire_names() {
        let value = serde_json::to_value(record("1 2 3 4", "0.5")).unwrap();
        assert_eq!(value["lable"], "dog");
        assert_eq!(value["cordinates"], "1 2 3 4");
        assert!(value.get("width").is_none());
    }

    #[test]
    fn malformed_record_is_attributed_to_its_index() {
        let records = vec![
            record("0 0 10 10", "0.9"),
            record("0 0 ten 10", "0.9"),
            record("0 0 10 10", "high"),
        ];
        let err = try_decode_records(&records).unwrap_err();
        assert_eq!(err.index, 1);
        assert!(err.reason.contains("ten"));

        let err = records[2].decode(2).unwrap_err();
        assert_eq!(err.index, 2);
    }

    #[test]
    fn lenient_decoding_keeps_the_good_records() {
        let records = vec![
            record("0 0 10 10", "0.9"),
            record("0 0 10", "0.9"),
            record("5 5 20 20", "0.7"),
            record("0 0 10 10", "1.5"),
        ];
        let objects = decode_records(&records);
        assert_eq!(objects.len(), 2);
        assert_eq!(objects[1].annotation, BoundingBox::new(5.0, 5.0, 20.0, 20.0).unwrap());
    }

    #[test]
    fn missing_or_mistyped_fields_fail_only_their_record() {
        let json = r#"[
            {"lable": "Food", "confidence": "0.9", "cordinates": null},
            {"lable": "Food", "confidence": 0.8, "width": 4, "cordinates": "1 2 5 6"},
            {"lable": "Food", "confidence": "0.9", "cordinates": 12},
            {"lable": "Food"}
        ]"#;
        let records: Vec<DetectorRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(records[1].width.as_deref(), Some("4"));

        let err = try_decode_records(&records).unwrap_err();
        assert_eq!(err.index, 0);
        assert_eq!(records[2].decode(2).unwrap_err().index, 2);
        assert_eq!(records[3].decode(3).unwrap_err().index, 3);

        let objects = decode_records(&records);
        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0].annotation, BoundingBox::new(1.0, 2.0, 5.0, 6.0).unwrap());
        assert_eq!(objects[0].confidence, 0.8);
    }

    #[test]
    fn best_label_is_highest_retained_candidate() {
        let object = EngineObject {
            frame: BoundingBox::new(10.0, 20.0, 110.0, 70.0).unwrap(),
            labels: vec![
                candidate("cup", 0, 0.55),
                candidate("mug", 1, 0.8),
                candidate("bowl", 2, 0.8),
                candidate("vase", 3, 0.3),
            ],
        };
        let record = DetectorRecord::from_engine_object(&object, &LabelPolicy::default());
        assert_eq!(
            record,
            DetectorRecord {
                label: Some("mug".to_string()),
                confidence: "0.8".to_string(),
                width: Some("100".to_string()),
                height: Some("50".to_string()),
                coordinates: "10 20 110 70".to_string(),
            }
        );
    }

    #[test]
    fn label_cap_and_threshold_apply() {
        let object = EngineObject {
            frame: BoundingBox::new(0.0, 0.0, 1.0, 1.0).unwrap(),
            labels: vec![candidate("a", 0, 0.7), candidate("b", 1, 0.6)],
        };
        let strict = LabelPolicy {
            confidence_threshold: 0.8,
            max_labels_per_object: 3,
        };
        let record = DetectorRecord::from_engine_object(&object, &strict);
        assert_eq!(record.label, None);
        assert_eq!(record.confidence, "0");
    }

    #[test]
    fn label_selection_does_not_leak_between_objects() {
        let objects = vec![
            EngineObject {
                frame: BoundingBox::new(0.0, 0.0, 5.0, 5.0).unwrap(),
                labels: vec![candidate("cat", 0, 0.9)],
            },
            EngineObject {
                frame: BoundingBox::new(5.0, 5.0, 9.0, 9.0).unwrap(),
                labels: vec![],
            },
        ];
        let records = records_from_engine_objects(&objects, &LabelPolicy::default()).unwrap();
        assert_eq!(records[0].label.as_deref(), Some("cat"));
        assert_eq!(records[1].label, None);
        assert_eq!(records[1].confidence, "0");
    }

    #[test]
    fn empty_or_unlabelled_runs_are_errors() {
        let policy = LabelPolicy::default();
        assert_eq!(
            records_from_engine_objects(&[], &policy).unwrap_err().code,
            EngineError::NO_OBJECTS
        );
        let unlabelled = [EngineObject {
            frame: BoundingBox::new(0.0, 0.0, 5.0, 5.0).unwrap(),
            labels: vec![candidate("cat", 0, 0.1)],
        }];
        assert_eq!(
            records_from_engine_objects(&unlabelled, &policy).unwrap_err().code,
            EngineError::NO_LABEL
        );
    }
}
