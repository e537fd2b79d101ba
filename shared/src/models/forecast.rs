//! Forecast windows and prediction results

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Days between the input date and the day the rain outcome is predicted for
pub const RAIN_TARGET_OFFSET_DAYS: i64 = 7;

/// Days between the input date and the start of the precipitation window
pub const PRECIPITATION_START_OFFSET_DAYS: i64 = 1;

/// Days between the input date and the end of the precipitation window
pub const PRECIPITATION_END_OFFSET_DAYS: i64 = 3;

/// Length of the precipitation window: three full days, inclusive
pub const PRECIPITATION_PERIOD_HOURS: i64 = 72;

/// Target dates and raw-data fetch ranges derived from one input date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForecastWindows {
    pub input_date: NaiveDate,
    pub rain_target_date: NaiveDate,
    pub precipitation_start: NaiveDate,
    pub precipitation_end: NaiveDate,
}

impl ForecastWindows {
    /// Resolve all windows for an input date. Pure date arithmetic.
    pub fn for_input(input_date: NaiveDate) -> Self {
        Self {
            input_date,
            rain_target_date: input_date + Duration::days(RAIN_TARGET_OFFSET_DAYS),
            precipitation_start: input_date + Duration::days(PRECIPITATION_START_OFFSET_DAYS),
            precipitation_end: input_date + Duration::days(PRECIPITATION_END_OFFSET_DAYS),
        }
    }

    /// Daily observations needed for the rain feature: the input date itself
    pub fn daily_fetch_range(&self) -> (NaiveDate, NaiveDate) {
        (self.input_date, self.input_date)
    }

    /// Hourly observations needed for the precipitation feature: the full
    /// 72-hour window
    pub fn hourly_fetch_range(&self) -> (NaiveDate, NaiveDate) {
        (self.precipitation_start, self.precipitation_end)
    }
}

/// Rain prediction for the target date
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RainPrediction {
    pub date: NaiveDate,
    pub will_rain: bool,
    /// Present only when the model exposes a probability estimate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

/// Full rain forecast response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RainForecast {
    pub input_date: NaiveDate,
    pub prediction: RainPrediction,
}

/// Cumulative precipitation prediction over the window
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PrecipitationPrediction {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub amount_mm: f64,
    pub period_hours: i64,
}

/// Full precipitation forecast response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PrecipitationForecast {
    pub input_date: NaiveDate,
    pub prediction: PrecipitationPrediction,
}
