//! Model Manifest - On-disk description of a trained classifier
//!
//! ```json
//! {
//!   "name": "habit-recommender",
//!   "version": "2024.11",
//!   "feature_names": ["Age", "Gender_Female", "..."],
//!   "classes": ["Meditate", "Read a book", "..."],
//!   "missing_marker": "missing",
//!   "backend": { "type": "logistic", "intercepts": {}, "coefficients": {} }
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ManifestError;
use crate::features::{TargetSchema, DEFAULT_CATEGORICAL_FIELDS, DEFAULT_MISSING_MARKER};
use crate::profile::ProfileFields;

/// Trained model description
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelManifest {
    pub name: String,
    #[serde(default)]
    pub version: String,
    /// Target schema, in training order
    pub feature_names: TargetSchema,
    /// Class labels, in the order the backend emits probabilities
    pub classes: Vec<String>,
    #[serde(default = "default_categorical_fields")]
    pub categorical_fields: Vec<String>,
    #[serde(default = "default_missing_marker")]
    pub missing_marker: String,
    #[serde(default)]
    pub profile_fields: ProfileFields,
    pub backend: BackendSpec,
}

fn default_categorical_fields() -> Vec<String> {
    DEFAULT_CATEGORICAL_FIELDS.iter().map(|s| s.to_string()).collect()
}

fn default_missing_marker() -> String {
    DEFAULT_MISSING_MARKER.to_string()
}

/// Prediction backend and its parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BackendSpec {
    /// Multinomial logistic regression with sparse named weights
    Logistic(LogisticWeights),
    /// ONNX graph exported from the training pipeline
    Onnx(OnnxSpec),
}

impl BackendSpec {
    pub fn kind(&self) -> &'static str {
        match self {
            BackendSpec::Logistic(_) => "logistic",
            BackendSpec::Onnx(_) => "onnx",
        }
    }
}

/// Sparse weights: class → feature → coefficient; absent entries are 0
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogisticWeights {
    #[serde(default)]
    pub intercepts: HashMap<String, f32>,
    #[serde(default)]
    pub coefficients: HashMap<String, HashMap<String, f32>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnnxSpec {
    /// Relative paths resolve against the manifest's directory
    pub path: String,
    /// Optional hex SHA-256 of the model file
    #[serde(default)]
    pub sha256: Option<String>,
}

impl ModelManifest {
    /// Parse a manifest from JSON text
    pub fn from_json(json: &str) -> Result<Self, ManifestError> {
        let manifest: Self = serde_json::from_str(json)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Read and parse a manifest file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Structural checks beyond what deserialization enforces
    pub fn validate(&self) -> Result<(), ManifestError> {
        if self.classes.is_empty() {
            return Err(ManifestError::NoClasses);
        }
        let mut seen = std::collections::HashSet::new();
        for class in &self.classes {
            if !seen.insert(class.as_str()) {
                return Err(ManifestError::DuplicateClass(class.clone()));
            }
        }
        Ok(())
    }
}
