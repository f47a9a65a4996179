use crate::error::EngineError;
use ndarray::{Array4, ArrayD};
use ort::inputs;
use ort::session::Session;
use ort::value::TensorRef;
use std::path::Path;

/// An onnxruntime inference session with one image input and one tensor output.
pub struct OrtInferenceSession {
    session: Session,
    input_name: &'static str,
    output_name: &'static str,
}

impl OrtInferenceSession {
    pub fn new(
        model_path: &Path,
        input_name: &'static str,
        output_name: &'static str,
    ) -> ort::Result<Self> {
        let session = Session::builder()?.commit_from_file(model_path)?;
        Ok(Self {
            session,
            input_name,
            output_name,
        })
    }

    /// Runs the model on an NCHW batch and copies the output tensor out of the session.
    pub fn run(&mut self, input_array: &Array4<f32>) -> Result<ArrayD<f32>, EngineError> {
        let outputs = self
            .session
            .run(inputs![self.input_name => TensorRef::from_array_view(input_array)?])?;
        let output = outputs[self.output_name].try_extract_array::<f32>()?.to_owned();
        Ok(output)
    }
}
