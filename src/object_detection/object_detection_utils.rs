use crate::annotations::bounding_box::{BoundingBox, BoundingBoxGeometry};
use crate::annotations::detection::Detection;
use crate::object_detection::boundary::{EngineObject, LabelCandidate, LabelPolicy};
use ndarray::ArrayView2;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Reads a file with the class names into a vector so that the number ids
/// which come directly from the inference session can be given meaning.
pub fn read_classes_txt_file(filepath: &Path) -> io::Result<Vec<String>> {
    BufReader::new(File::open(filepath)?).lines().collect()
}

/// Non maxmimum suppression is a way of removing duplicate detections.
///
/// Detections are compared only against others with the same label. The survivors are
/// returned highest confidence first.
pub fn non_maximum_suppression<T: BoundingBoxGeometry>(
    mut detections: Vec<Detection<T>>,
    iou_threshold: f64,
) -> Vec<Detection<T>> {
    detections.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    let mut detections_to_remove: Vec<bool> = vec![false; detections.len()];
    for (current_index, current_det) in detections.iter().enumerate() {
        if detections_to_remove[current_index] {
            continue;
        }
        for (other_index, other_det) in detections[current_index + 1..].iter().enumerate() {
            let other_index = current_index + other_index + 1;
            if detections_to_remove[other_index] || current_det.label != other_det.label {
                continue;
            }
            let iou = current_det
                .annotation
                .intersection_over_union(&other_det.annotation);
            if iou > iou_threshold {
                detections_to_remove[other_index] = true;
            }
        }
    }
    let mut drop_iter = detections_to_remove.into_iter();
    detections.retain(|_| !drop_iter.next().unwrap_or(false));
    detections
}

/// A candidate frame remembering which output row it came from.
#[derive(Clone, Copy, Debug, PartialEq)]
struct RowBox {
    frame: BoundingBox,
    row: usize,
}

impl BoundingBoxGeometry for RowBox {
    fn left(&self) -> f64 {
        self.frame.left()
    }

    fn top(&self) -> f64 {
        self.frame.top()
    }

    fn right(&self) -> f64 {
        self.frame.right()
    }

    fn bottom(&self) -> f64 {
        self.frame.bottom()
    }
}

/// Decodes YOLO bounding box output into engine objects in source image pixels.
///
/// `output` has one row per candidate: `cx, cy, w, h` in model input pixels followed by one
/// score per class. `scale` maps model input pixels to source pixels on each axis and frames
/// are clipped to `image_size`. Rows whose best class misses the confidence threshold are
/// dropped, then duplicates are removed with [`non_maximum_suppression`].
pub fn decode_yolo_output(
    output: ArrayView2<f32>,
    class_names: &[String],
    policy: &LabelPolicy,
    scale: (f64, f64),
    image_size: (u32, u32),
    iou_threshold: f64,
) -> Vec<EngineObject> {
    if output.ncols() < 5 {
        return Vec::new();
    }
    let (max_x, max_y) = (f64::from(image_size.0), f64::from(image_size.1));
    let mut candidates: Vec<Vec<LabelCandidate>> = Vec::with_capacity(output.nrows());
    let mut detections: Vec<Detection<RowBox>> = Vec::new();
    for (row_ix, row) in output.rows().into_iter().enumerate() {
        let labels: Vec<LabelCandidate> = row
            .iter()
            .skip(4) // skips bounding box coords.
            .enumerate()
            .filter(|(_, score)| **score >= policy.confidence_threshold)
            .map(|(index, score)| LabelCandidate {
                text: class_names
                    .get(index)
                    .cloned()
                    .unwrap_or_else(|| index.to_string()),
                index,
                confidence: *score,
            })
            .collect();
        let best = labels
            .iter()
            .reduce(|accum, label| if label.confidence > accum.confidence { label } else { accum })
            .map(|l| (l.text.clone(), f64::from(l.confidence)));
        let (cx, cy, w, h) = (
            f64::from(row[0]),
            f64::from(row[1]),
            f64::from(row[2]),
            f64::from(row[3]),
        );
        let frame = BoundingBox::new(
            ((cx - w / 2.0) * scale.0).clamp(0.0, max_x),
            ((cy - h / 2.0) * scale.1).clamp(0.0, max_y),
            ((cx + w / 2.0) * scale.0).clamp(0.0, max_x),
            ((cy + h / 2.0) * scale.1).clamp(0.0, max_y),
        );
        candidates.push(labels);
        if let (Some((label, confidence)), Ok(frame)) = (best, frame) {
            detections.push(Detection {
                annotation: RowBox { frame, row: row_ix },
                label: Some(label),
                confidence,
            });
        }
    }
    non_maximum_suppression(detections, iou_threshold)
        .into_iter()
        .map(|det| EngineObject {
            frame: det.annotation.frame,
            labels: std::mem::take(&mut candidates[det.annotation.row]),
        })
        .collect()
}
