//! Model info handler

use axum::{extract::State, Json};

use crate::models::ModelInfoResponse;
use crate::AppState;

/// Loaded model, schema fingerprint and inference stats
pub async fn info(State(state): State<AppState>) -> Json<ModelInfoResponse> {
    let recommender = &state.recommender;
    let aligner = recommender.aligner();

    Json(ModelInfoResponse {
        status: recommender.status(),
        layout: aligner.schema().info(),
        categorical_fields: aligner.categorical().fields().to_vec(),
        missing_marker: aligner.categorical().missing_marker().to_string(),
        classes: recommender.classes().to_vec(),
    })
}
