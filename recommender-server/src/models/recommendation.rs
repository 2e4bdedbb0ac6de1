//! Recommendation payloads

use serde::{Deserialize, Serialize};

use habit_recommender_core::{EngineStatus, LayoutInfo, Recommendation};

/// Successful `POST /recommendation` body
#[derive(Debug, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub recommended_habits: Vec<Recommendation>,
}

/// `GET /api/v1/model` body
#[derive(Debug, Serialize)]
pub struct ModelInfoResponse {
    pub status: EngineStatus,
    pub layout: LayoutInfo,
    pub categorical_fields: Vec<String>,
    pub missing_marker: String,
    pub classes: Vec<String>,
}
