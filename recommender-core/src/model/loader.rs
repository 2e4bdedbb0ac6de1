//! Model Loader - Manifest → ready-to-serve model
//!
//! Loading happens once at startup. The result is immutable.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::ManifestError;
use crate::features::{CategoricalFields, FeatureAligner};
use crate::profile::ProfileFields;

use super::logistic::LogisticModel;
use super::manifest::{BackendSpec, ModelManifest};
use super::ProbabilityModel;

/// Model metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub name: String,
    pub version: String,
    pub backend: String,
    pub source: String,
    pub loaded_at: DateTime<Utc>,
}

/// Trained model plus everything needed to feed it
pub struct LoadedModel {
    pub info: ModelInfo,
    pub aligner: FeatureAligner,
    pub classes: Vec<String>,
    pub profile_fields: ProfileFields,
    pub backend: Box<dyn ProbabilityModel>,
}

impl std::fmt::Debug for LoadedModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedModel")
            .field("info", &self.info)
            .field("features", &self.aligner.schema().len())
            .field("classes", &self.classes.len())
            .finish()
    }
}

impl LoadedModel {
    /// Load a manifest file and its backend
    pub fn load(manifest_path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let manifest_path = manifest_path.as_ref();
        log::info!("Loading model manifest from: {}", manifest_path.display());

        let manifest = ModelManifest::from_file(manifest_path)?;
        let base_dir = manifest_path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_manifest(manifest, base_dir, &manifest_path.display().to_string())
    }

    /// Build from an already parsed manifest
    ///
    /// `base_dir` resolves relative backend paths.
    pub fn from_manifest(
        manifest: ModelManifest,
        base_dir: &Path,
        source: &str,
    ) -> Result<Self, ManifestError> {
        manifest.validate()?;

        let schema = manifest.feature_names;
        let backend: Box<dyn ProbabilityModel> = match &manifest.backend {
            BackendSpec::Logistic(weights) => {
                Box::new(LogisticModel::from_weights(weights, &schema, &manifest.classes)?)
            }
            BackendSpec::Onnx(spec) => {
                let path = resolve_path(base_dir, &spec.path);
                if let Some(expected) = &spec.sha256 {
                    verify_checksum(&path, expected)?;
                }
                load_onnx(&path, schema.len(), manifest.classes.len())?
            }
        };

        let categorical = CategoricalFields::new(manifest.categorical_fields)
            .with_missing_marker(manifest.missing_marker);
        let aligner = FeatureAligner::new(schema, categorical);

        let summary = aligner.summary();
        for field in &summary.fields_without_columns {
            log::warn!("Categorical field '{}' has no columns in the schema", field);
        }
        for field in &summary.fields_without_missing_column {
            log::debug!("Categorical field '{}' has no missing indicator column", field);
        }

        let info = ModelInfo {
            name: manifest.name,
            version: manifest.version,
            backend: backend.backend_name().to_string(),
            source: source.to_string(),
            loaded_at: Utc::now(),
        };

        log::info!(
            "Model '{}' loaded: {} features ({} numeric, {} one-hot), {} classes, layout {:08x}",
            info.name,
            aligner.schema().len(),
            summary.numeric,
            summary.one_hot,
            manifest.classes.len(),
            aligner.schema().layout_hash()
        );

        Ok(Self {
            info,
            aligner,
            classes: manifest.classes,
            profile_fields: manifest.profile_fields,
            backend,
        })
    }
}

fn resolve_path(base_dir: &Path, path: &str) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

#[cfg(feature = "onnx")]
fn load_onnx(
    path: &Path,
    feature_count: usize,
    class_count: usize,
) -> Result<Box<dyn ProbabilityModel>, ManifestError> {
    let model = super::onnx::OnnxModel::load(path, feature_count, class_count)?;
    Ok(Box::new(model))
}

#[cfg(not(feature = "onnx"))]
fn load_onnx(
    _path: &Path,
    _feature_count: usize,
    _class_count: usize,
) -> Result<Box<dyn ProbabilityModel>, ManifestError> {
    Err(ManifestError::BackendUnavailable("onnx".to_string()))
}

/// Compare a file's SHA-256 against an expected hex digest
pub fn verify_checksum(path: &Path, expected: &str) -> Result<(), ManifestError> {
    let bytes = std::fs::read(path).map_err(|source| ManifestError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let actual = hex::encode(Sha256::digest(&bytes));

    if !actual.eq_ignore_ascii_case(expected.trim()) {
        return Err(ManifestError::ChecksumMismatch {
            path: path.display().to_string(),
            expected: expected.to_string(),
            actual,
        });
    }
    Ok(())
}
