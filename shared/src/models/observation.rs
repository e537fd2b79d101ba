//! Raw weather observation models
//!
//! Observations come from the weather provider as time-indexed columns.
//! A field that the provider did not report is `None`; it is never
//! silently replaced with zero or any other default.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Aggregated observation for one calendar day
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyObservation {
    pub date: NaiveDate,
    pub temperature_2m_max: Option<f64>,
    pub temperature_2m_min: Option<f64>,
    pub temperature_2m_mean: Option<f64>,
    pub relative_humidity_2m_max: Option<f64>,
    pub relative_humidity_2m_min: Option<f64>,
    pub pressure_msl_mean: Option<f64>,
    pub wind_speed_10m_max: Option<f64>,
    pub wind_speed_10m_mean: Option<f64>,
    pub wind_direction_10m_dominant: Option<f64>,
    pub precipitation_sum: Option<f64>,
    pub rain_sum: Option<f64>,
    pub shortwave_radiation_sum: Option<f64>,
    pub daylight_duration: Option<f64>,
}

impl DailyObservation {
    /// Look up a field by its provider name
    pub fn field(&self, name: &str) -> Option<f64> {
        match name {
            "temperature_2m_max" => self.temperature_2m_max,
            "temperature_2m_min" => self.temperature_2m_min,
            "temperature_2m_mean" => self.temperature_2m_mean,
            "relative_humidity_2m_max" => self.relative_humidity_2m_max,
            "relative_humidity_2m_min" => self.relative_humidity_2m_min,
            "pressure_msl_mean" => self.pressure_msl_mean,
            "wind_speed_10m_max" => self.wind_speed_10m_max,
            "wind_speed_10m_mean" => self.wind_speed_10m_mean,
            "wind_direction_10m_dominant" => self.wind_direction_10m_dominant,
            "precipitation_sum" => self.precipitation_sum,
            "rain_sum" => self.rain_sum,
            "shortwave_radiation_sum" => self.shortwave_radiation_sum,
            "daylight_duration" => self.daylight_duration,
            _ => None,
        }
    }
}

/// Instantaneous observation for one hour
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HourlyObservation {
    pub timestamp: NaiveDateTime,
    pub temperature_2m: Option<f64>,
    pub relative_humidity_2m: Option<f64>,
    pub dew_point_2m: Option<f64>,
    pub precipitation: Option<f64>,
    pub rain: Option<f64>,
    pub pressure_msl: Option<f64>,
    pub cloud_cover: Option<f64>,
    pub wind_speed_10m: Option<f64>,
    pub wind_direction_10m: Option<f64>,
    pub shortwave_radiation: Option<f64>,
    pub surface_pressure: Option<f64>,
    pub cloud_cover_low: Option<f64>,
    pub cloud_cover_mid: Option<f64>,
    pub cloud_cover_high: Option<f64>,
}

impl HourlyObservation {
    /// Look up a field by its provider name
    pub fn field(&self, name: &str) -> Option<f64> {
        match name {
            "temperature_2m" => self.temperature_2m,
            "relative_humidity_2m" => self.relative_humidity_2m,
            "dew_point_2m" => self.dew_point_2m,
            "precipitation" => self.precipitation,
            "rain" => self.rain,
            "pressure_msl" => self.pressure_msl,
            "cloud_cover" => self.cloud_cover,
            "wind_speed_10m" => self.wind_speed_10m,
            "wind_direction_10m" => self.wind_direction_10m,
            "shortwave_radiation" => self.shortwave_radiation,
            "surface_pressure" => self.surface_pressure,
            "cloud_cover_low" => self.cloud_cover_low,
            "cloud_cover_mid" => self.cloud_cover_mid,
            "cloud_cover_high" => self.cloud_cover_high,
            _ => None,
        }
    }
}
