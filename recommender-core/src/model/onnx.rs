//! ONNX Backend - ONNX Runtime Integration
//!
//! Expects a classifier exported with a `float[1, n_features]` input and a
//! probability output of `n_classes` floats (sklearn exports need the
//! zipmap disabled). The first float output of the right size is used.

use std::path::Path;

use ndarray::Array2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;
use parking_lot::Mutex;

use crate::error::InferenceError;

use super::ProbabilityModel;

pub struct OnnxModel {
    /// `Session::run` needs `&mut`, so calls are serialized
    session: Mutex<Session>,
    feature_count: usize,
    class_count: usize,
}

impl OnnxModel {
    /// Load ONNX model from file
    pub fn load(path: &Path, feature_count: usize, class_count: usize) -> Result<Self, InferenceError> {
        log::info!("Loading ONNX model from: {}", path.display());

        if !path.exists() {
            return Err(InferenceError(format!("Model not found: {}", path.display())));
        }

        let session = Session::builder()
            .map_err(|e| InferenceError(format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| InferenceError(format!("Failed to set optimization: {}", e)))?
            .commit_from_file(path)
            .map_err(|e| InferenceError(format!("Failed to load model: {}", e)))?;

        log::info!("ONNX model loaded successfully");

        Ok(Self {
            session: Mutex::new(session),
            feature_count,
            class_count,
        })
    }
}

impl ProbabilityModel for OnnxModel {
    fn backend_name(&self) -> &'static str {
        "onnx"
    }

    fn predict_proba(&self, features: &[f32]) -> Result<Vec<f32>, InferenceError> {
        if features.len() != self.feature_count {
            return Err(InferenceError(format!(
                "expected {} features, got {}",
                self.feature_count,
                features.len()
            )));
        }

        let input_array = Array2::<f32>::from_shape_vec((1, self.feature_count), features.to_vec())
            .map_err(|e| InferenceError(format!("Array error: {}", e)))?;

        let input_tensor = Value::from_array(input_array)
            .map_err(|e| InferenceError(format!("Tensor error: {}", e)))?;

        let mut session = self.session.lock();
        let outputs = session
            .run(ort::inputs![input_tensor])
            .map_err(|e| InferenceError(format!("Inference failed: {}", e)))?;

        for (_, output) in outputs.iter() {
            if let Ok((_, data)) = output.try_extract_tensor::<f32>() {
                if data.len() == self.class_count {
                    return Ok(data.to_vec());
                }
            }
        }

        Err(InferenceError(format!(
            "no float output with {} probabilities",
            self.class_count
        )))
    }
}
