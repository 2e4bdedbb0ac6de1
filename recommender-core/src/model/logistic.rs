//! Logistic Backend - Multinomial logistic regression in pure Rust
//!
//! Probabilities are `softmax(intercept + W·x)`. Weights arrive sparse and
//! keyed by name; they are resolved into a dense matrix against the schema
//! once, at load time.

use crate::error::{InferenceError, ManifestError};
use crate::features::TargetSchema;

use super::manifest::LogisticWeights;
use super::ProbabilityModel;

#[derive(Debug, Clone)]
pub struct LogisticModel {
    /// classes × features, row-major
    coefficients: Vec<f32>,
    intercepts: Vec<f32>,
    feature_count: usize,
}

impl LogisticModel {
    /// Resolve named weights against the schema and class order
    pub fn from_weights(
        weights: &LogisticWeights,
        schema: &TargetSchema,
        classes: &[String],
    ) -> Result<Self, ManifestError> {
        let class_index = |class: &str| {
            classes
                .iter()
                .position(|c| c == class)
                .ok_or_else(|| ManifestError::UnknownClass(class.to_string()))
        };

        let feature_count = schema.len();
        let mut intercepts = vec![0.0f32; classes.len()];
        let mut coefficients = vec![0.0f32; classes.len() * feature_count];

        for (class, intercept) in &weights.intercepts {
            intercepts[class_index(class)?] = *intercept;
        }

        for (class, row) in &weights.coefficients {
            let c = class_index(class)?;
            for (feature, weight) in row {
                let f = schema
                    .index_of(feature)
                    .ok_or_else(|| ManifestError::UnknownFeature {
                        class: class.clone(),
                        feature: feature.clone(),
                    })?;
                coefficients[c * feature_count + f] = *weight;
            }
        }

        Ok(Self {
            coefficients,
            intercepts,
            feature_count,
        })
    }

    pub fn class_count(&self) -> usize {
        self.intercepts.len()
    }

    fn logits(&self, features: &[f32]) -> Vec<f32> {
        self.intercepts
            .iter()
            .zip(self.coefficients.chunks(self.feature_count))
            .map(|(b, row)| b + row.iter().zip(features).map(|(w, x)| w * x).sum::<f32>())
            .collect()
    }
}

impl ProbabilityModel for LogisticModel {
    fn backend_name(&self) -> &'static str {
        "logistic"
    }

    fn predict_proba(&self, features: &[f32]) -> Result<Vec<f32>, InferenceError> {
        if features.len() != self.feature_count {
            return Err(InferenceError(format!(
                "expected {} features, got {}",
                self.feature_count,
                features.len()
            )));
        }
        if let Some(i) = features.iter().position(|x| !x.is_finite()) {
            return Err(InferenceError(format!("feature {} is not finite", i)));
        }

        let logits = self.logits(features);
        if let Some(c) = logits.iter().position(|l| !l.is_finite()) {
            return Err(InferenceError(format!("logit for class {} overflowed", c)));
        }

        Ok(softmax(&logits))
    }
}

/// Numerically stable softmax
pub fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|l| (l - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn classes() -> Vec<String> {
        vec!["Meditate".to_string(), "Pray".to_string(), "Read".to_string()]
    }

    fn schema() -> TargetSchema {
        TargetSchema::new(["Age", "Gender_Female"]).unwrap()
    }

    fn weights() -> LogisticWeights {
        LogisticWeights {
            intercepts: HashMap::from([("Read".to_string(), 0.5)]),
            coefficients: HashMap::from([(
                "Pray".to_string(),
                HashMap::from([("Gender_Female".to_string(), 2.0)]),
            )]),
        }
    }

    #[test]
    fn test_softmax_sums_to_one() {
        let p = softmax(&[1.0, 2.0, 3.0]);
        let sum: f32 = p.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
        assert!(p[2] > p[1] && p[1] > p[0]);
    }

    #[test]
    fn test_softmax_large_logits() {
        let p = softmax(&[1000.0, 1000.0]);
        assert!((p[0] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_predict_proba() {
        let model = LogisticModel::from_weights(&weights(), &schema(), &classes()).unwrap();
        assert_eq!(model.class_count(), 3);

        let female = model.predict_proba(&[30.0, 1.0]).unwrap();
        assert_eq!(female.len(), 3);
        assert!(female[1] > female[2] && female[2] > female[0]);

        let male = model.predict_proba(&[30.0, 0.0]).unwrap();
        assert!(male[2] > male[1]);
        assert!((male[0] - male[1]).abs() < 1e-6);
    }

    #[test]
    fn test_wrong_length_rejected() {
        let model = LogisticModel::from_weights(&weights(), &schema(), &classes()).unwrap();
        assert!(model.predict_proba(&[1.0]).is_err());
    }

    #[test]
    fn test_nan_rejected() {
        let model = LogisticModel::from_weights(&weights(), &schema(), &classes()).unwrap();
        assert!(model.predict_proba(&[f32::NAN, 1.0]).is_err());
    }

    #[test]
    fn test_logit_overflow_rejected() {
        let weights = LogisticWeights {
            intercepts: HashMap::new(),
            coefficients: HashMap::from([
                ("Meditate".to_string(), HashMap::from([("Age".to_string(), 5.0)])),
                ("Pray".to_string(), HashMap::from([("Age".to_string(), -5.0)])),
            ]),
        };
        let model = LogisticModel::from_weights(&weights, &schema(), &classes()).unwrap();
        let result = model.predict_proba(&[1e38, 0.0]);
        assert!(result.unwrap_err().0.contains("overflowed"));
    }

    #[test]
    fn test_unknown_names_rejected() {
        let mut bad_class = weights();
        bad_class.intercepts.insert("Swim".to_string(), 1.0);
        assert!(matches!(
            LogisticModel::from_weights(&bad_class, &schema(), &classes()),
            Err(ManifestError::UnknownClass(c)) if c == "Swim"
        ));

        let mut bad_feature = weights();
        bad_feature
            .coefficients
            .insert("Read".to_string(), HashMap::from([("Height".to_string(), 1.0)]));
        assert!(matches!(
            LogisticModel::from_weights(&bad_feature, &schema(), &classes()),
            Err(ManifestError::UnknownFeature { feature, .. }) if feature == "Height"
        ));
    }
}
