//! Model Module - Trained classifier loading and inference
//!
//! Inference is kept behind [`ProbabilityModel`] so the backend can be
//! swapped without touching alignment or ranking.

pub mod loader;
pub mod logistic;
pub mod manifest;
#[cfg(feature = "onnx")]
pub mod onnx;

// Re-export common types
pub use loader::{verify_checksum, LoadedModel, ModelInfo};
pub use logistic::LogisticModel;
pub use manifest::{BackendSpec, LogisticWeights, ModelManifest, OnnxSpec};

use crate::error::InferenceError;

/// A classifier with a `predict_proba` contract
///
/// Implementations are read-only after construction and shared across
/// request handlers.
pub trait ProbabilityModel: Send + Sync {
    fn backend_name(&self) -> &'static str;

    /// One probability per class, in manifest class order
    fn predict_proba(&self, features: &[f32]) -> Result<Vec<f32>, InferenceError>;
}
