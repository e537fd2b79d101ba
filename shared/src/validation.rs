//! Validation utilities for the Weather Prediction API

use chrono::NaiveDate;

// ============================================================================
// Input Validations
// ============================================================================

/// Parse a caller-supplied date in `YYYY-MM-DD` form.
///
/// Impossible calendar dates (`2024-02-30`), wrong separators and free-form
/// strings are all rejected with the same message.
pub fn parse_input_date(raw: &str) -> Result<NaiveDate, &'static str> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| "date must be a valid calendar date in YYYY-MM-DD format")
}

/// Validate that a coordinate pair is a plausible WGS84 position
pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), &'static str> {
    if !(-90.0..=90.0).contains(&latitude) {
        return Err("latitude must be between -90 and 90 degrees");
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err("longitude must be between -180 and 180 degrees");
    }
    Ok(())
}
