//! Weather Prediction API - Backend Server
//!
//! Turns a single calendar date into two forecasts for Sydney,
//! Australia: a binary rain prediction 7 days ahead and a cumulative
//! precipitation estimate for the following 72 hours, using fitted
//! models over live weather observations.

use axum::{routing::get, Json, Router};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod external;
mod handlers;
mod models;
mod routes;
mod services;

pub use config::Config;

use external::OpenMeteoClient;
use services::PredictionEngine;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub weather: OpenMeteoClient,
    pub engine: Arc<PredictionEngine>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "weather_prediction_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::load()?;

    tracing::info!("Starting Weather Prediction Server");
    tracing::info!("Environment: {}", config.environment);
    tracing::info!(
        "Serviced location: ({}, {})",
        config.weather.latitude,
        config.weather.longitude
    );

    // Load model artifacts once, before any request is served
    let engine = Arc::new(PredictionEngine::load(&config.models));
    if !engine.classifier_loaded() && !engine.regressor_loaded() {
        tracing::warn!("No model artifacts loaded; all forecast endpoints will return 503");
    }

    // Weather provider client
    let weather = OpenMeteoClient::new(&config.weather)?;

    // Create application state
    let state = AppState {
        weather,
        engine,
        config: Arc::new(config.clone()),
    };

    // Build application
    let app = create_app(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes and middleware
fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(liveness))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint: service description
async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "project": "Weather Prediction API",
        "description": "Weather forecasting service providing rain predictions and \
                        precipitation forecasts for Sydney, Australia",
        "objectives": [
            "Predict if it will rain in exactly 7 days (binary classification)",
            "Predict cumulative precipitation amount for the next 3 days (regression)"
        ],
        "endpoints": {
            "/": "GET - Service description",
            "/health": "GET - Liveness check",
            "/api/v1/health": "GET - Health check with model status",
            "/api/v1/predict/rain": "GET - Rain prediction 7 days ahead",
            "/api/v1/predict/precipitation/fall": "GET - 3-day precipitation forecast"
        },
        "input_parameters": {
            "date": "Required date parameter in YYYY-MM-DD format"
        },
        "location": "Sydney, Australia (-33.8678, 151.2073)"
    }))
}

/// Liveness endpoint
async fn liveness() -> &'static str {
    "OK"
}
