//! Weather provider client for fetching raw observations
//!
//! Integrates with the Open-Meteo archive API (past dates) and forecast
//! API (future dates) for one fixed coordinate. Responses are
//! time-indexed columns; a value the provider did not report stays
//! absent instead of being filled with a default.

use chrono::{NaiveDate, NaiveDateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use shared::{
    DailyObservation, HourlyObservation, PRECIPITATION_FEATURE_FIELDS, RAIN_FEATURE_FIELDS,
};
use std::time::Duration;

use crate::config::WeatherConfig;
use crate::error::{AppError, AppResult};

/// Weather provider client
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    client: Client,
    archive_url: String,
    forecast_url: String,
    latitude: f64,
    longitude: f64,
    timezone: String,
}

/// Open-Meteo response carrying daily columns
#[derive(Debug, Deserialize)]
struct DailyResponse {
    daily: DailyBlock,
}

#[derive(Debug, Default, Deserialize)]
struct DailyBlock {
    #[serde(default)]
    time: Vec<String>,
    #[serde(default)]
    temperature_2m_max: Vec<Option<f64>>,
    #[serde(default)]
    temperature_2m_min: Vec<Option<f64>>,
    #[serde(default)]
    temperature_2m_mean: Vec<Option<f64>>,
    #[serde(default)]
    relative_humidity_2m_max: Vec<Option<f64>>,
    #[serde(default)]
    relative_humidity_2m_min: Vec<Option<f64>>,
    #[serde(default)]
    pressure_msl_mean: Vec<Option<f64>>,
    #[serde(default)]
    wind_speed_10m_max: Vec<Option<f64>>,
    #[serde(default)]
    wind_speed_10m_mean: Vec<Option<f64>>,
    #[serde(default)]
    wind_direction_10m_dominant: Vec<Option<f64>>,
    #[serde(default)]
    precipitation_sum: Vec<Option<f64>>,
    #[serde(default)]
    rain_sum: Vec<Option<f64>>,
    #[serde(default)]
    shortwave_radiation_sum: Vec<Option<f64>>,
    #[serde(default)]
    daylight_duration: Vec<Option<f64>>,
}

/// Open-Meteo response carrying hourly columns
#[derive(Debug, Deserialize)]
struct HourlyResponse {
    hourly: HourlyBlock,
}

#[derive(Debug, Default, Deserialize)]
struct HourlyBlock {
    #[serde(default)]
    time: Vec<String>,
    #[serde(default)]
    temperature_2m: Vec<Option<f64>>,
    #[serde(default)]
    relative_humidity_2m: Vec<Option<f64>>,
    #[serde(default)]
    dew_point_2m: Vec<Option<f64>>,
    #[serde(default)]
    precipitation: Vec<Option<f64>>,
    #[serde(default)]
    rain: Vec<Option<f64>>,
    #[serde(default)]
    pressure_msl: Vec<Option<f64>>,
    #[serde(default)]
    cloud_cover: Vec<Option<f64>>,
    #[serde(default)]
    wind_speed_10m: Vec<Option<f64>>,
    #[serde(default)]
    wind_direction_10m: Vec<Option<f64>>,
    #[serde(default)]
    shortwave_radiation: Vec<Option<f64>>,
    #[serde(default)]
    surface_pressure: Vec<Option<f64>>,
    #[serde(default)]
    cloud_cover_low: Vec<Option<f64>>,
    #[serde(default)]
    cloud_cover_mid: Vec<Option<f64>>,
    #[serde(default)]
    cloud_cover_high: Vec<Option<f64>>,
}

impl OpenMeteoClient {
    /// Create a new client from configuration
    pub fn new(config: &WeatherConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| AppError::Configuration(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            archive_url: config.archive_url.clone(),
            forecast_url: config.forecast_url.clone(),
            latitude: config.latitude,
            longitude: config.longitude,
            timezone: config.timezone.clone(),
        })
    }

    /// Past and present dates live in the archive; future dates only
    /// exist on the forecast endpoint.
    fn base_url_for(&self, end: NaiveDate) -> &str {
        if end <= Utc::now().date_naive() {
            &self.archive_url
        } else {
            &self.forecast_url
        }
    }

    /// Fetch daily observations for a date range, keyed by date
    pub async fn fetch_daily(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<DailyObservation>> {
        let url = self.base_url_for(end).to_string();
        let body = self
            .request(&url, start, end, "daily", &RAIN_FEATURE_FIELDS)
            .await?;

        let data: DailyResponse = serde_json::from_str(&body).map_err(|e| {
            AppError::DataUnavailable(format!("failed to parse daily response: {}", e))
        })?;

        daily_observations(data.daily)
    }

    /// Fetch hourly observations for a date range, keyed by timestamp
    pub async fn fetch_hourly(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<HourlyObservation>> {
        let url = self.base_url_for(end).to_string();
        let body = self
            .request(&url, start, end, "hourly", &PRECIPITATION_FEATURE_FIELDS)
            .await?;

        let data: HourlyResponse = serde_json::from_str(&body).map_err(|e| {
            AppError::DataUnavailable(format!("failed to parse hourly response: {}", e))
        })?;

        hourly_observations(data.hourly)
    }

    async fn request(
        &self,
        url: &str,
        start: NaiveDate,
        end: NaiveDate,
        granularity: &str,
        fields: &[&str],
    ) -> AppResult<String> {
        let response = self
            .client
            .get(url)
            .query(&[
                ("latitude", self.latitude.to_string()),
                ("longitude", self.longitude.to_string()),
                ("start_date", start.to_string()),
                ("end_date", end.to_string()),
                (granularity, fields.join(",")),
                ("timezone", self.timezone.clone()),
            ])
            .send()
            .await
            .map_err(|e| {
                AppError::DataUnavailable(format!("weather provider request failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::DataUnavailable(format!(
                "weather provider returned {}: {}",
                status, body
            )));
        }

        response.text().await.map_err(|e| {
            AppError::DataUnavailable(format!("failed to read provider response: {}", e))
        })
    }
}

/// Value of a column at `index`; both a short column and an explicit
/// null count as absence.
fn column(values: &[Option<f64>], index: usize) -> Option<f64> {
    values.get(index).copied().flatten()
}

fn daily_observations(block: DailyBlock) -> AppResult<Vec<DailyObservation>> {
    let mut observations = Vec::with_capacity(block.time.len());

    for (i, raw_date) in block.time.iter().enumerate() {
        let date = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d").map_err(|_| {
            AppError::DataUnavailable(format!("provider returned malformed date `{}`", raw_date))
        })?;

        observations.push(DailyObservation {
            date,
            temperature_2m_max: column(&block.temperature_2m_max, i),
            temperature_2m_min: column(&block.temperature_2m_min, i),
            temperature_2m_mean: column(&block.temperature_2m_mean, i),
            relative_humidity_2m_max: column(&block.relative_humidity_2m_max, i),
            relative_humidity_2m_min: column(&block.relative_humidity_2m_min, i),
            pressure_msl_mean: column(&block.pressure_msl_mean, i),
            wind_speed_10m_max: column(&block.wind_speed_10m_max, i),
            wind_speed_10m_mean: column(&block.wind_speed_10m_mean, i),
            wind_direction_10m_dominant: column(&block.wind_direction_10m_dominant, i),
            precipitation_sum: column(&block.precipitation_sum, i),
            rain_sum: column(&block.rain_sum, i),
            shortwave_radiation_sum: column(&block.shortwave_radiation_sum, i),
            daylight_duration: column(&block.daylight_duration, i),
        });
    }

    Ok(observations)
}

fn hourly_observations(block: HourlyBlock) -> AppResult<Vec<HourlyObservation>> {
    let mut observations = Vec::with_capacity(block.time.len());

    for (i, raw_time) in block.time.iter().enumerate() {
        // Open-Meteo hourly timestamps carry no seconds: 2023-06-16T00:00
        let timestamp = NaiveDateTime::parse_from_str(raw_time, "%Y-%m-%dT%H:%M").map_err(|_| {
            AppError::DataUnavailable(format!(
                "provider returned malformed timestamp `{}`",
                raw_time
            ))
        })?;

        observations.push(HourlyObservation {
            timestamp,
            temperature_2m: column(&block.temperature_2m, i),
            relative_humidity_2m: column(&block.relative_humidity_2m, i),
            dew_point_2m: column(&block.dew_point_2m, i),
            precipitation: column(&block.precipitation, i),
            rain: column(&block.rain, i),
            pressure_msl: column(&block.pressure_msl, i),
            cloud_cover: column(&block.cloud_cover, i),
            wind_speed_10m: column(&block.wind_speed_10m, i),
            wind_direction_10m: column(&block.wind_direction_10m, i),
            shortwave_radiation: column(&block.shortwave_radiation, i),
            surface_pressure: column(&block.surface_pressure, i),
            cloud_cover_low: column(&block.cloud_cover_low, i),
            cloud_cover_mid: column(&block.cloud_cover_mid, i),
            cloud_cover_high: column(&block.cloud_cover_high, i),
        });
    }

    Ok(observations)
}
