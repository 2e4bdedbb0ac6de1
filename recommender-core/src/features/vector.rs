//! Feature Vector - Aligned model input
//!
//! **Fingerprinted feature vector**
//!
//! Every vector carries the layout version and hash of the schema it was
//! aligned against, so a vector built for one model cannot be silently fed
//! to another.

use serde::{Deserialize, Serialize};

use super::layout::{TargetSchema, LAYOUT_VERSION};
use crate::error::SchemaError;

/// Aligned feature vector with layout metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Layout fingerprint version
    pub version: u8,
    /// CRC32 hash of the schema layout (for mismatch detection)
    pub layout_hash: u32,
    /// Feature values in schema order
    pub values: Vec<f32>,
}

impl FeatureVector {
    /// Create a zeroed vector for a schema
    pub fn zeroed(schema: &TargetSchema) -> Self {
        Self {
            version: LAYOUT_VERSION,
            layout_hash: schema.layout_hash(),
            values: vec![0.0; schema.len()],
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get values as slice
    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    /// Get feature by index
    pub fn get(&self, index: usize) -> Option<f32> {
        self.values.get(index).copied()
    }

    /// Get feature by name
    pub fn get_by_name(&self, schema: &TargetSchema, name: &str) -> Option<f32> {
        schema.index_of(name).and_then(|i| self.get(i))
    }

    /// Set feature by index
    pub fn set(&mut self, index: usize, value: f32) {
        if let Some(slot) = self.values.get_mut(index) {
            *slot = value;
        }
    }

    /// Validate that this vector was aligned against `schema`
    pub fn validate(&self, schema: &TargetSchema) -> Result<(), SchemaError> {
        schema.validate_fingerprint(self.version, self.layout_hash)?;
        if self.values.len() != schema.len() {
            return Err(SchemaError::LayoutMismatch {
                expected_version: LAYOUT_VERSION,
                expected_hash: schema.layout_hash(),
                actual_version: self.version,
                actual_hash: self.layout_hash,
            });
        }
        Ok(())
    }

    /// Non-zero features by name, for debug logging
    pub fn active_features<'a>(&self, schema: &'a TargetSchema) -> Vec<(&'a str, f32)> {
        schema
            .names()
            .iter()
            .zip(self.values.iter())
            .filter(|(_, v)| **v != 0.0)
            .map(|(name, v)| (name.as_str(), *v))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> TargetSchema {
        TargetSchema::new(["Age", "Gender_Female", "Gender_Male"]).unwrap()
    }

    #[test]
    fn test_zeroed() {
        let schema = schema();
        let vector = FeatureVector::zeroed(&schema);
        assert_eq!(vector.len(), 3);
        assert!(vector.values.iter().all(|v| *v == 0.0));
        assert!(vector.validate(&schema).is_ok());
    }

    #[test]
    fn test_set_and_get_by_name() {
        let schema = schema();
        let mut vector = FeatureVector::zeroed(&schema);
        vector.set(1, 1.0);
        vector.set(99, 1.0);
        assert_eq!(vector.get_by_name(&schema, "Gender_Female"), Some(1.0));
        assert_eq!(vector.get_by_name(&schema, "missing"), None);
        assert_eq!(vector.active_features(&schema), vec![("Gender_Female", 1.0)]);
    }

    #[test]
    fn test_validate_against_other_schema() {
        let vector = FeatureVector::zeroed(&schema());
        let other = TargetSchema::new(["Age", "Gender_Male", "Gender_Female"]).unwrap();
        assert!(vector.validate(&other).is_err());
    }
}
