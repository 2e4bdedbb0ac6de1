//! Features Module - Feature Alignment Engine
//!
//! Reshapes an arbitrary incoming record into the exact vector layout a
//! trained model expects.

pub mod aligner;
pub mod categorical;
pub mod layout;
pub mod record;
pub mod vector;

#[cfg(test)]
mod tests;

// Re-export common types
pub use aligner::{align, FeatureAligner, PlanSummary, Slot};
pub use categorical::{CategoricalFields, DEFAULT_CATEGORICAL_FIELDS, DEFAULT_MISSING_MARKER};
pub use layout::{LayoutInfo, TargetSchema, LAYOUT_VERSION};
pub use record::{FeatureValue, RawRecord};
pub use vector::FeatureVector;
