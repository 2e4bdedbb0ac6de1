//! Error handling

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use habit_recommender_core::RecommendError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Request errors
    #[error("Missing required field(s): {}", .0.join(", "))]
    MissingFields(Vec<String>),

    #[error("{0}")]
    BadRequest(String),

    // Alignment or model errors
    #[error("Prediction error: {0}")]
    Prediction(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = self.to_string();

        let (status, body) = match &self {
            AppError::MissingFields(fields) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": message, "missing_fields": fields }),
            ),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, json!({ "error": message })),
            AppError::Prediction(msg) => {
                tracing::error!("Error in recommendation: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": message }))
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<RecommendError> for AppError {
    fn from(err: RecommendError) -> Self {
        AppError::Prediction(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}
