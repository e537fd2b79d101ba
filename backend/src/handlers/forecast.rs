//! HTTP handlers for forecast endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use shared::{parse_input_date, PrecipitationForecast, RainForecast};

use crate::error::{AppError, AppResult};
use crate::services::ForecastService;
use crate::AppState;

/// Query parameters for forecast endpoints
#[derive(Debug, Deserialize)]
pub struct ForecastQuery {
    /// Date in YYYY-MM-DD format
    pub date: String,
}

/// Predict whether it will rain exactly 7 days after the given date
pub async fn predict_rain(
    State(state): State<AppState>,
    Query(query): Query<ForecastQuery>,
) -> AppResult<Json<RainForecast>> {
    let input_date =
        parse_input_date(&query.date).map_err(|msg| AppError::InvalidInput(msg.to_string()))?;

    let service = ForecastService::new(state.weather.clone(), state.engine.clone());
    let forecast = service.forecast_rain(input_date).await?;
    Ok(Json(forecast))
}

/// Predict cumulative precipitation over the 72 hours following the
/// given date
pub async fn predict_precipitation(
    State(state): State<AppState>,
    Query(query): Query<ForecastQuery>,
) -> AppResult<Json<PrecipitationForecast>> {
    let input_date =
        parse_input_date(&query.date).map_err(|msg| AppError::InvalidInput(msg.to_string()))?;

    let service = ForecastService::new(state.weather.clone(), state.engine.clone());
    let forecast = service.forecast_precipitation(input_date).await?;
    Ok(Json(forecast))
}
