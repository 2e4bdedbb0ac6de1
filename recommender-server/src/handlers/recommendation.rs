//! Recommendation handler

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde_json::Value;

use habit_recommender_core::profile::missing_required_fields;
use habit_recommender_core::UserProfile;

use crate::models::RecommendationResponse;
use crate::{AppError, AppResult, AppState};

/// Top-N habit recommendations for a user profile
pub async fn recommend(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<RecommendationResponse>> {
    let Json(body) = payload?;
    tracing::debug!("Received data: {}", body);

    let Value::Object(body) = body else {
        return Err(AppError::BadRequest("Request body must be a JSON object".to_string()));
    };

    // Reject before touching the model
    let missing = missing_required_fields(&body);
    if !missing.is_empty() {
        tracing::info!("Recommendation request missing fields: {:?}", missing);
        return Err(AppError::MissingFields(missing));
    }

    let profile = UserProfile::from_json_object(&body)?;
    let recommended_habits = state.recommender.recommend_profile(&profile)?;

    tracing::debug!("Recommended: {:?}", recommended_habits);

    Ok(Json(RecommendationResponse { recommended_habits }))
}
