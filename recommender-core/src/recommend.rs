//! Recommender - Explicit, load-once service object
//!
//! Holds the aligner, class labels and probability backend. Built once at
//! startup and shared read-only (`Arc<Recommender>`) with request handlers.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::RecommendError;
use crate::features::{FeatureAligner, FeatureVector, RawRecord, Slot};
use crate::model::{LoadedModel, ModelInfo, ProbabilityModel};
use crate::profile::{ProfileFields, UserProfile};

/// Number of recommendations returned by default
pub const DEFAULT_TOP_N: usize = 3;

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// One ranked class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub habit: String,
    pub probability: f32,
}

/// Engine status for the model info endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineStatus {
    pub model_name: String,
    pub model_version: String,
    pub backend: String,
    pub feature_count: usize,
    pub class_count: usize,
    pub layout_hash: u32,
    pub top_n: usize,
    pub inference_count: u64,
    pub failure_count: u64,
    pub avg_latency_ms: f32,
    pub loaded_at: DateTime<Utc>,
}

/// Latency stats
#[derive(Debug, Default)]
struct InferenceStats {
    latency_sum_us: AtomicU64,
    inference_count: AtomicU64,
    failure_count: AtomicU64,
}

// ============================================================================
// RECOMMENDER
// ============================================================================

pub struct Recommender {
    info: ModelInfo,
    aligner: FeatureAligner,
    classes: Vec<String>,
    profile_fields: ProfileFields,
    backend: Box<dyn ProbabilityModel>,
    top_n: usize,
    stats: InferenceStats,
}

impl Recommender {
    /// `top_n` is clamped to at least 1
    pub fn new(model: LoadedModel, top_n: usize) -> Self {
        Self {
            info: model.info,
            aligner: model.aligner,
            classes: model.classes,
            profile_fields: model.profile_fields,
            backend: model.backend,
            top_n: top_n.max(1),
            stats: InferenceStats::default(),
        }
    }

    pub fn info(&self) -> &ModelInfo {
        &self.info
    }

    pub fn aligner(&self) -> &FeatureAligner {
        &self.aligner
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    /// Recommend habits for an API profile
    pub fn recommend_profile(&self, profile: &UserProfile) -> Result<Vec<Recommendation>, RecommendError> {
        let record = profile.to_record(&self.profile_fields);
        self.recommend(&record)
    }

    /// Align, predict and rank a raw record
    pub fn recommend(&self, record: &RawRecord) -> Result<Vec<Recommendation>, RecommendError> {
        let start_time = Instant::now();
        let result = self.predict(record);

        match &result {
            Ok(_) => {
                let elapsed = start_time.elapsed().as_micros() as u64;
                self.stats.latency_sum_us.fetch_add(elapsed, Ordering::Relaxed);
                self.stats.inference_count.fetch_add(1, Ordering::Relaxed);
            }
            Err(_) => {
                self.stats.failure_count.fetch_add(1, Ordering::Relaxed);
            }
        }

        result
    }

    fn predict(&self, record: &RawRecord) -> Result<Vec<Recommendation>, RecommendError> {
        self.check_numeric(record)?;

        for (field, value) in self.aligner.unseen_categories(record) {
            log::debug!("Unseen category {}={:?}, contributes nothing", field, value);
        }

        let features = self.aligner.align(record);
        log::debug!("Active features: {:?}", features.active_features(self.aligner.schema()));

        let probabilities = self.predict_proba(&features)?;

        Ok(rank(&self.classes, &probabilities, self.top_n))
    }

    /// Full probability vector, in class order
    pub fn predict_proba(&self, features: &FeatureVector) -> Result<Vec<f32>, RecommendError> {
        features.validate(self.aligner.schema())?;

        let probabilities = self.backend.predict_proba(features.as_slice())?;
        if probabilities.len() != self.classes.len() {
            return Err(RecommendError::ClassCountMismatch {
                expected: self.classes.len(),
                actual: probabilities.len(),
            });
        }
        for (class, &p) in self.classes.iter().zip(&probabilities) {
            if !p.is_finite() || !(0.0..=1.0).contains(&p) {
                return Err(RecommendError::InvalidProbability {
                    class: class.clone(),
                    value: p,
                });
            }
        }
        Ok(probabilities)
    }

    /// Pass-through features must be coercible when present
    fn check_numeric(&self, record: &RawRecord) -> Result<(), RecommendError> {
        for slot in self.aligner.slots() {
            if let Slot::Numeric(field) = slot {
                if let Some(value) = record.get(field) {
                    if value.as_number().map_or(true, |n| !n.is_finite()) {
                        return Err(RecommendError::NonNumericFeature {
                            field: field.clone(),
                            value: value.to_string(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    pub fn status(&self) -> EngineStatus {
        let sum = self.stats.latency_sum_us.load(Ordering::Relaxed);
        let count = self.stats.inference_count.load(Ordering::Relaxed);
        let avg = if count > 0 { (sum as f32 / count as f32) / 1000.0 } else { 0.0 };

        EngineStatus {
            model_name: self.info.name.clone(),
            model_version: self.info.version.clone(),
            backend: self.info.backend.clone(),
            feature_count: self.aligner.schema().len(),
            class_count: self.classes.len(),
            layout_hash: self.aligner.schema().layout_hash(),
            top_n: self.top_n,
            inference_count: count,
            failure_count: self.stats.failure_count.load(Ordering::Relaxed),
            avg_latency_ms: avg,
            loaded_at: self.info.loaded_at,
        }
    }
}

/// Top `n` classes by descending probability; ties keep class order
pub fn rank(classes: &[String], probabilities: &[f32], n: usize) -> Vec<Recommendation> {
    let mut indices: Vec<usize> = (0..classes.len().min(probabilities.len())).collect();
    indices.sort_by(|&a, &b| probabilities[b].total_cmp(&probabilities[a]));

    indices
        .into_iter()
        .take(n)
        .map(|i| Recommendation {
            habit: classes[i].clone(),
            probability: probabilities[i],
        })
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
