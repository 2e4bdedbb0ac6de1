//! Target Schema - Feature layout the model was trained on
//!
//! **The schema defines the exact length and order of every feature vector.**
//!
//! ## Rules:
//! 1. Order comes from training and is never rearranged at inference time
//! 2. Names are unique
//! 3. The fingerprint covers the version and every name in order, so
//!    reordering a schema changes its hash

use std::collections::HashMap;

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

// ============================================================================
// LAYOUT VERSION
// ============================================================================

/// Fingerprint format version
/// MUST be incremented when the hashing scheme changes
pub const LAYOUT_VERSION: u8 = 1;

// ============================================================================
// TARGET SCHEMA
// ============================================================================

/// Ordered, immutable list of feature names expected by a trained model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct TargetSchema {
    names: Vec<String>,
    #[serde(skip)]
    index: HashMap<String, usize>,
    #[serde(skip)]
    hash: u32,
}

impl TargetSchema {
    /// Build a schema from feature names in training order
    pub fn new<I, S>(names: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err(SchemaError::Empty);
        }

        let mut index = HashMap::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            if index.insert(name.clone(), i).is_some() {
                return Err(SchemaError::DuplicateFeature(name.clone()));
            }
        }

        let hash = compute_layout_hash(&names);
        Ok(Self { names, index, hash })
    }

    /// Number of features
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Always false: empty schemas are rejected at construction
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Feature names in order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Get feature index by name
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Get feature name by index
    pub fn name_at(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// CRC32 fingerprint of the layout
    pub fn layout_hash(&self) -> u32 {
        self.hash
    }

    /// Validate that a vector tagged with `(version, hash)` belongs to this schema
    pub fn validate_fingerprint(&self, version: u8, hash: u32) -> Result<(), SchemaError> {
        if version != LAYOUT_VERSION || hash != self.hash {
            return Err(SchemaError::LayoutMismatch {
                expected_version: LAYOUT_VERSION,
                expected_hash: self.hash,
                actual_version: version,
                actual_hash: hash,
            });
        }
        Ok(())
    }

    /// Serializable summary for logging and the model info endpoint
    pub fn info(&self) -> LayoutInfo {
        LayoutInfo {
            version: LAYOUT_VERSION,
            hash: self.hash,
            feature_count: self.names.len(),
            feature_names: self.names.clone(),
        }
    }
}

impl TryFrom<Vec<String>> for TargetSchema {
    type Error = SchemaError;

    fn try_from(names: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(names)
    }
}

impl From<TargetSchema> for Vec<String> {
    fn from(schema: TargetSchema) -> Self {
        schema.names
    }
}

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// Compute CRC32 hash of a feature layout
/// Used to detect layout mismatches at runtime
pub fn compute_layout_hash<S: AsRef<str>>(names: &[S]) -> u32 {
    let mut hasher = Hasher::new();

    hasher.update(&[LAYOUT_VERSION]);

    for name in names {
        hasher.update(name.as_ref().as_bytes());
        hasher.update(&[0]); // Separator
    }

    hasher.finalize()
}

// ============================================================================
// LAYOUT INFO
// ============================================================================

/// Complete layout information for serialization/logging
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub version: u8,
    pub hash: u32,
    pub feature_count: usize,
    pub feature_names: Vec<String>,
}

// ============================================================================
// TESTS
// ============================================================================
