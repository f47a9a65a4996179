use crate::annotations::image_ref::ImageRef;
use crate::error::EngineError;
use crate::image_utils::image_conversion::convert_rgb_image_to_owned_array;
use crate::image_utils::image_io::read_image_as_rgb8;
use crate::object_detection::boundary::{DetectorRecord, LabelPolicy, records_from_engine_objects};
use crate::object_detection::object_detection_model::ObjectDetectionModel;
use crate::object_detection::object_detection_utils::decode_yolo_output;
use crate::object_detection::ort_inference_session::OrtInferenceSession;
use image::imageops::{self, FilterType};
use ndarray::{Axis, Ix2};
use std::path::Path;
use std::sync::Mutex;
use tracing::debug;

/// YOLOv11 bounding box model running on onnxruntime.
pub struct Yolov11BoundingBox {
    ort_session: Mutex<OrtInferenceSession>,
    class_names: Vec<String>,
    input_width: u32,
    input_height: u32,
    label_policy: LabelPolicy,
    iou_threshold: f64,
}

impl Yolov11BoundingBox {
    pub fn new(
        model_path: &Path,
        class_names: Vec<String>,
        input_width: u32,
        input_height: u32,
        label_policy: LabelPolicy,
        iou_threshold: f64,
    ) -> ort::Result<Self> {
        let ort_session = OrtInferenceSession::new(model_path, "images", "output0")?;
        Ok(Yolov11BoundingBox {
            ort_session: Mutex::new(ort_session),
            class_names,
            input_width,
            input_height,
            label_policy,
            iou_threshold,
        })
    }
}

impl ObjectDetectionModel for Yolov11BoundingBox {
    fn detect(&self, image: &ImageRef) -> Result<Vec<DetectorRecord>, EngineError> {
        let rgb = read_image_as_rgb8(&image.local_path())?;
        let (orig_w, orig_h) = rgb.dimensions();
        let resized = imageops::resize(
            &rgb,
            self.input_width,
            self.input_height,
            FilterType::Triangle,
        );
        let input_array = convert_rgb_image_to_owned_array(&resized);

        let raw = self
            .ort_session
            .lock()
            .map_err(|_| EngineError::new("InferenceError", "inference session poisoned"))?
            .run(&input_array)?;
        // (1, 4 + classes, candidates) -> (candidates, 4 + classes)
        let output = raw
            .index_axis(Axis(0), 0)
            .t()
            .to_owned()
            .into_dimensionality::<Ix2>()
            .map_err(|e| EngineError::new("InferenceError", e.to_string()))?;

        let objects = decode_yolo_output(
            output.view(),
            &self.class_names,
            &self.label_policy,
            (
                f64::from(orig_w) / f64::from(self.input_width),
                f64::from(orig_h) / f64::from(self.input_height),
            ),
            (orig_w, orig_h),
            self.iou_threshold,
        );
        debug!(uri = image.uri(), objects = objects.len(), "yolov11 inference finished");
        records_from_engine_objects(&objects, &self.label_policy)
    }
}
