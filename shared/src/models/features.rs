//! Feature schemas and feature vectors
//!
//! The field lists below are the training-time contract of the fitted
//! models: selection AND order are fixed. Changing either without
//! retraining silently corrupts predictions, so vectors are built only
//! through the functions in this module, and every model artifact embeds
//! the same schema for the engine to cross-check at load time.

use serde::Serialize;
use thiserror::Error;

use crate::models::{DailyObservation, HourlyObservation};

/// Daily fields feeding the rain classifier, in training order
pub const RAIN_FEATURE_FIELDS: [&str; 13] = [
    "temperature_2m_max",
    "temperature_2m_min",
    "temperature_2m_mean",
    "relative_humidity_2m_max",
    "relative_humidity_2m_min",
    "pressure_msl_mean",
    "wind_speed_10m_max",
    "wind_speed_10m_mean",
    "wind_direction_10m_dominant",
    "precipitation_sum",
    "rain_sum",
    "shortwave_radiation_sum",
    "daylight_duration",
];

/// Hourly fields feeding the precipitation regressor, in training order
pub const PRECIPITATION_FEATURE_FIELDS: [&str; 14] = [
    "temperature_2m",
    "relative_humidity_2m",
    "dew_point_2m",
    "precipitation",
    "rain",
    "pressure_msl",
    "cloud_cover",
    "wind_speed_10m",
    "wind_direction_10m",
    "shortwave_radiation",
    "surface_pressure",
    "cloud_cover_low",
    "cloud_cover_mid",
    "cloud_cover_high",
];

/// Errors raised while turning observations into feature vectors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FeatureError {
    #[error("required field `{0}` is missing from the observation")]
    MissingField(&'static str),

    #[error("required field `{0}` is not a finite number")]
    NotFinite(&'static str),

    #[error("no hourly observations were supplied for the window")]
    EmptyWindow,
}

/// Ordered numeric input for the rain classifier
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RainFeatureVector(Vec<f64>);

impl RainFeatureVector {
    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Ordered numeric input for the precipitation regressor
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PrecipitationFeatureVector(Vec<f64>);

impl PrecipitationFeatureVector {
    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn extract<F>(fields: &'static [&'static str], lookup: F) -> Result<Vec<f64>, FeatureError>
where
    F: Fn(&'static str) -> Option<f64>,
{
    let mut values = Vec::with_capacity(fields.len());
    for &field in fields {
        let value = lookup(field).ok_or(FeatureError::MissingField(field))?;
        if !value.is_finite() {
            // Recent dates can surface NaN placeholders for hours the
            // provider has not fully reported yet.
            return Err(FeatureError::NotFinite(field));
        }
        values.push(value);
    }
    Ok(values)
}

/// Build the classifier input from one daily observation.
///
/// Fails if any schema field is absent or non-finite; values are never
/// defaulted or inferred.
pub fn build_rain_features(
    observation: &DailyObservation,
) -> Result<RainFeatureVector, FeatureError> {
    extract(&RAIN_FEATURE_FIELDS, |field| observation.field(field)).map(RainFeatureVector)
}

/// Build the regressor input from the hourly series spanning the
/// precipitation window.
///
/// The representative record is the first hour of the window, mirroring
/// the extraction rule used when the regressor was trained.
pub fn build_precipitation_features(
    series: &[HourlyObservation],
) -> Result<PrecipitationFeatureVector, FeatureError> {
    let representative = series.first().ok_or(FeatureError::EmptyWindow)?;
    extract(&PRECIPITATION_FEATURE_FIELDS, |field| {
        representative.field(field)
    })
    .map(PrecipitationFeatureVector)
}
