//! Habit Recommender Core
//!
//! Feature alignment and model inference for the habit recommendation
//! service. The HTTP layer lives in `habit-recommender-server`; everything
//! here is transport-agnostic.
//!
//! # Pipeline
//!
//! ```text
//! UserProfile ──► RawRecord ──► FeatureAligner ──► FeatureVector
//!                                                        │
//!                    Recommendation ◄── top-N ◄── ProbabilityModel
//! ```

pub mod error;
pub mod features;
pub mod model;
pub mod profile;
pub mod recommend;

// Re-export common types
pub use error::{InferenceError, ManifestError, RecommendError, SchemaError};
pub use features::{
    align, CategoricalFields, FeatureAligner, FeatureValue, FeatureVector, LayoutInfo, RawRecord,
    TargetSchema,
};
pub use model::{LoadedModel, ModelManifest, ProbabilityModel};
pub use profile::{ProfileFields, UserProfile};
pub use recommend::{EngineStatus, Recommendation, Recommender, DEFAULT_TOP_N};
