//! Health check handlers

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub environment: String,
    pub models: ModelStatus,
}

#[derive(Serialize)]
pub struct ModelStatus {
    pub rain_classifier_loaded: bool,
    pub precipitation_regressor_loaded: bool,
}

/// Health check endpoint handler.
///
/// Reports model availability only; provider reachability is not probed
/// here, so the two signals stay independent.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        environment: state.config.environment.clone(),
        models: ModelStatus {
            rain_classifier_loaded: state.engine.classifier_loaded(),
            precipitation_regressor_loaded: state.engine.regressor_loaded(),
        },
    })
}
