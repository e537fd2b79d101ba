//! Route definitions for the Weather Prediction API

use axum::{routing::get, Router};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Forecasts
        .nest("/predict", prediction_routes())
}

/// Forecast routes
fn prediction_routes() -> Router<AppState> {
    Router::new()
        .route("/rain", get(handlers::predict_rain))
        .route("/precipitation/fall", get(handlers::predict_precipitation))
}
