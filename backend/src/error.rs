//! Error handling for the Weather Prediction API
//!
//! Every failure is classified into exactly one taxonomy kind with a
//! stable code, so callers can tell "ask again later", "service
//! misconfigured" and "bad input" apart.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::FeatureError;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Caller errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // Upstream data errors
    #[error("Weather data unavailable: {0}")]
    DataUnavailable(String),

    #[error("Required weather fields incomplete: {field}")]
    FeatureIncomplete { field: String },

    // Model errors
    #[error("Model not available: {0}")]
    ModelUnavailable(&'static str),

    #[error("Invalid feature vector: {0}")]
    InvalidFeatureVector(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

impl From<FeatureError> for AppError {
    fn from(err: FeatureError) -> Self {
        match err {
            FeatureError::MissingField(field) => AppError::FeatureIncomplete {
                field: field.to_string(),
            },
            FeatureError::NotFinite(field) => AppError::FeatureIncomplete {
                field: field.to_string(),
            },
            FeatureError::EmptyWindow => AppError::DataUnavailable(
                "no hourly observations were returned for the requested window".to_string(),
            ),
        }
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match &self {
            AppError::InvalidInput(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "INVALID_INPUT".to_string(),
                    message: msg.clone(),
                    field: Some("date".to_string()),
                },
            ),
            AppError::DataUnavailable(msg) => (
                StatusCode::BAD_GATEWAY,
                ErrorDetail {
                    code: "DATA_UNAVAILABLE".to_string(),
                    message: format!("Weather provider data unavailable: {}", msg),
                    field: None,
                },
            ),
            AppError::FeatureIncomplete { field } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorDetail {
                    code: "FEATURE_INCOMPLETE".to_string(),
                    message: format!(
                        "Weather field `{}` is missing or not yet reported for the requested \
                         date; recent dates are often incomplete, try an earlier date",
                        field
                    ),
                    field: Some(field.clone()),
                },
            ),
            AppError::ModelUnavailable(model) => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorDetail {
                    code: "MODEL_UNAVAILABLE".to_string(),
                    message: format!("The {} model is not loaded", model),
                    field: None,
                },
            ),
            AppError::InvalidFeatureVector(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INVALID_FEATURE_VECTOR".to_string(),
                    message: format!("Feature vector does not match the model schema: {}", msg),
                    field: None,
                },
            ),
            AppError::Configuration(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "CONFIGURATION_ERROR".to_string(),
                    message: format!("Configuration error: {}", msg),
                    field: None,
                },
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message: msg.clone(),
                    field: None,
                },
            ),
            AppError::InternalError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message: "An internal server error occurred".to_string(),
                    field: None,
                },
            ),
        };

        // Log the error for debugging
        tracing::error!("Error: {:?}", self);

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
