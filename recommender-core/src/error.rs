//! Error types
//!
//! The aligner itself is infallible; these cover schema construction,
//! model loading and the prediction call.

use thiserror::Error;

/// Invalid target schema
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("target schema is empty")]
    Empty,

    #[error("duplicate feature name in target schema: {0}")]
    DuplicateFeature(String),

    #[error(
        "feature layout mismatch: expected v{expected_version} (hash: {expected_hash:08x}), got v{actual_version} (hash: {actual_hash:08x})"
    )]
    LayoutMismatch {
        expected_version: u8,
        expected_hash: u32,
        actual_version: u8,
        actual_hash: u32,
    },
}

/// Failure while loading a model manifest or its backend
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse manifest: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("manifest declares no classes")]
    NoClasses,

    #[error("duplicate class label: {0}")]
    DuplicateClass(String),

    #[error("unknown class in backend weights: {0}")]
    UnknownClass(String),

    #[error("unknown feature in backend weights for class {class}: {feature}")]
    UnknownFeature { class: String, feature: String },

    #[error("checksum mismatch for {path}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        path: String,
        expected: String,
        actual: String,
    },

    #[error("backend '{0}' is not available in this build")]
    BackendUnavailable(String),

    #[error(transparent)]
    Backend(#[from] InferenceError),
}

/// Failure inside a probability backend
#[derive(Debug, Clone, PartialEq, Error)]
#[error("InferenceError: {0}")]
pub struct InferenceError(pub String);

/// Failure while producing a recommendation
#[derive(Debug, Error)]
pub enum RecommendError {
    #[error("feature '{field}' is not numeric: {value}")]
    NonNumericFeature { field: String, value: String },

    #[error("field '{field}' has an invalid type: {reason}")]
    InvalidField { field: String, reason: String },

    #[error(transparent)]
    Layout(#[from] SchemaError),

    #[error(transparent)]
    Inference(#[from] InferenceError),

    #[error("model returned probability {value} for class '{class}'")]
    InvalidProbability { class: String, value: f32 },

    #[error("model returned {actual} probabilities for {expected} classes")]
    ClassCountMismatch { expected: usize, actual: usize },
}
