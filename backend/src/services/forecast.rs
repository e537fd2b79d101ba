//! Forecast orchestration
//!
//! Composes window resolution, data fetching, feature building and the
//! prediction engine. Each step either yields its full result or fails
//! with one taxonomy kind; no partial forecast is ever returned, and an
//! incomplete observation is never downgraded into a "no rain" or
//! "0 mm" answer.

use chrono::NaiveDate;
use shared::{
    build_precipitation_features, build_rain_features, ForecastWindows, PrecipitationForecast,
    PrecipitationPrediction, RainForecast, RainPrediction, PRECIPITATION_PERIOD_HOURS,
};
use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::external::OpenMeteoClient;
use crate::services::PredictionEngine;

/// Forecast service composing the prediction pipeline
#[derive(Clone)]
pub struct ForecastService {
    weather: OpenMeteoClient,
    engine: Arc<PredictionEngine>,
}

impl ForecastService {
    /// Create a new ForecastService instance
    pub fn new(weather: OpenMeteoClient, engine: Arc<PredictionEngine>) -> Self {
        Self { weather, engine }
    }

    /// Predict whether it will rain exactly 7 days after the input date
    pub async fn forecast_rain(&self, input_date: NaiveDate) -> AppResult<RainForecast> {
        // Skip the provider round-trip when the model cannot serve anyway
        if !self.engine.classifier_loaded() {
            return Err(AppError::ModelUnavailable("rain classifier"));
        }

        let windows = ForecastWindows::for_input(input_date);
        let (start, end) = windows.daily_fetch_range();

        let observations = self.weather.fetch_daily(start, end).await?;
        let observation = observations
            .iter()
            .find(|obs| obs.date == input_date)
            .ok_or_else(|| {
                AppError::DataUnavailable(format!(
                    "no daily observation returned for {}",
                    input_date
                ))
            })?;

        let vector = build_rain_features(observation)?;
        let output = self.engine.predict_rain(&vector)?;

        tracing::debug!(
            "Rain forecast for {}: will_rain={} (target {})",
            input_date,
            output.will_rain,
            windows.rain_target_date
        );

        Ok(RainForecast {
            input_date,
            prediction: RainPrediction {
                date: windows.rain_target_date,
                will_rain: output.will_rain,
                confidence: output.confidence,
            },
        })
    }

    /// Predict cumulative precipitation over the 72 hours following the
    /// input date
    pub async fn forecast_precipitation(
        &self,
        input_date: NaiveDate,
    ) -> AppResult<PrecipitationForecast> {
        if !self.engine.regressor_loaded() {
            return Err(AppError::ModelUnavailable("precipitation regressor"));
        }

        let windows = ForecastWindows::for_input(input_date);
        let (start, end) = windows.hourly_fetch_range();

        let series = self.weather.fetch_hourly(start, end).await?;
        if series.is_empty() {
            return Err(AppError::DataUnavailable(format!(
                "no hourly observations returned for {} to {}",
                start, end
            )));
        }

        let vector = build_precipitation_features(&series)?;
        let output = self.engine.predict_precipitation_fall(&vector)?;

        tracing::debug!(
            "Precipitation forecast for {}: {:.1}mm over {} to {}",
            input_date,
            output.amount_mm,
            windows.precipitation_start,
            windows.precipitation_end
        );

        Ok(PrecipitationForecast {
            input_date,
            prediction: PrecipitationPrediction {
                start_date: windows.precipitation_start,
                end_date: windows.precipitation_end,
                amount_mm: output.amount_mm,
                period_hours: PRECIPITATION_PERIOD_HOURS,
            },
        })
    }
}
