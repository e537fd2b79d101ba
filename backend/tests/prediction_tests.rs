//! Prediction pipeline tests
//!
//! Covers the date-window contract, the feature-extraction contract and
//! the no-substitution policy for missing or unreportable fields.

use chrono::NaiveDate;
use proptest::prelude::*;
use shared::{
    build_precipitation_features, build_rain_features, DailyObservation, FeatureError,
    ForecastWindows, HourlyObservation, PrecipitationPrediction, PRECIPITATION_FEATURE_FIELDS,
    PRECIPITATION_PERIOD_HOURS, RAIN_FEATURE_FIELDS,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn daily_from_values(day: NaiveDate, values: &[f64; 13]) -> DailyObservation {
    DailyObservation {
        date: day,
        temperature_2m_max: Some(values[0]),
        temperature_2m_min: Some(values[1]),
        temperature_2m_mean: Some(values[2]),
        relative_humidity_2m_max: Some(values[3]),
        relative_humidity_2m_min: Some(values[4]),
        pressure_msl_mean: Some(values[5]),
        wind_speed_10m_max: Some(values[6]),
        wind_speed_10m_mean: Some(values[7]),
        wind_direction_10m_dominant: Some(values[8]),
        precipitation_sum: Some(values[9]),
        rain_sum: Some(values[10]),
        shortwave_radiation_sum: Some(values[11]),
        daylight_duration: Some(values[12]),
    }
}

fn hourly_from_values(timestamp: chrono::NaiveDateTime, values: &[f64; 14]) -> HourlyObservation {
    HourlyObservation {
        timestamp,
        temperature_2m: Some(values[0]),
        relative_humidity_2m: Some(values[1]),
        dew_point_2m: Some(values[2]),
        precipitation: Some(values[3]),
        rain: Some(values[4]),
        pressure_msl: Some(values[5]),
        cloud_cover: Some(values[6]),
        wind_speed_10m: Some(values[7]),
        wind_direction_10m: Some(values[8]),
        shortwave_radiation: Some(values[9]),
        surface_pressure: Some(values[10]),
        cloud_cover_low: Some(values[11]),
        cloud_cover_mid: Some(values[12]),
        cloud_cover_high: Some(values[13]),
    }
}

/// Clear one schema field on a daily observation by name
fn clear_daily_field(observation: &mut DailyObservation, name: &str) {
    match name {
        "temperature_2m_max" => observation.temperature_2m_max = None,
        "temperature_2m_min" => observation.temperature_2m_min = None,
        "temperature_2m_mean" => observation.temperature_2m_mean = None,
        "relative_humidity_2m_max" => observation.relative_humidity_2m_max = None,
        "relative_humidity_2m_min" => observation.relative_humidity_2m_min = None,
        "pressure_msl_mean" => observation.pressure_msl_mean = None,
        "wind_speed_10m_max" => observation.wind_speed_10m_max = None,
        "wind_speed_10m_mean" => observation.wind_speed_10m_mean = None,
        "wind_direction_10m_dominant" => observation.wind_direction_10m_dominant = None,
        "precipitation_sum" => observation.precipitation_sum = None,
        "rain_sum" => observation.rain_sum = None,
        "shortwave_radiation_sum" => observation.shortwave_radiation_sum = None,
        "daylight_duration" => observation.daylight_duration = None,
        other => panic!("unknown daily field {other}"),
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[test]
fn test_documented_window_scenario() {
    // Input 2023-06-15: rain target a week out, precipitation window the
    // following three days inclusive.
    let windows = ForecastWindows::for_input(date(2023, 6, 15));

    assert_eq!(windows.rain_target_date, date(2023, 6, 22));
    assert_eq!(windows.precipitation_start, date(2023, 6, 16));
    assert_eq!(windows.precipitation_end, date(2023, 6, 18));
    assert_eq!(PRECIPITATION_PERIOD_HOURS, 72);
}

#[test]
fn test_missing_pressure_yields_no_vector() {
    let mut observation = daily_from_values(date(2023, 6, 15), &[1.0; 13]);
    observation.pressure_msl_mean = None;

    // No zero is ever substituted for a missing field.
    assert_eq!(
        build_rain_features(&observation),
        Err(FeatureError::MissingField("pressure_msl_mean"))
    );
}

#[test]
fn test_precipitation_prediction_wire_shape() {
    let prediction = PrecipitationPrediction {
        start_date: date(2023, 6, 16),
        end_date: date(2023, 6, 18),
        amount_mm: 4.2,
        period_hours: PRECIPITATION_PERIOD_HOURS,
    };

    let json = serde_json::to_value(&prediction).unwrap();
    assert_eq!(json["start_date"], "2023-06-16");
    assert_eq!(json["end_date"], "2023-06-18");
    assert_eq!(json["period_hours"], 72);
}

// ============================================================================
// Property-Based Tests
// ============================================================================

/// Strategy for arbitrary calendar dates across a wide practical range
fn date_strategy() -> impl Strategy<Value = NaiveDate> {
    (1950i32..=2100, 1u32..=12, 1u32..=28).prop_map(|(y, m, d)| date(y, m, d))
}

fn value_strategy() -> impl Strategy<Value = f64> {
    -1000.0..1000.0f64
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// The rain target is always exactly 7 days after the input date
    #[test]
    fn prop_rain_target_offset(input in date_strategy()) {
        let windows = ForecastWindows::for_input(input);
        prop_assert_eq!((windows.rain_target_date - input).num_days(), 7);
    }

    /// The precipitation window always starts the next day and spans
    /// exactly 72 hours inclusive
    #[test]
    fn prop_precipitation_window_span(input in date_strategy()) {
        let windows = ForecastWindows::for_input(input);

        prop_assert_eq!((windows.precipitation_start - input).num_days(), 1);
        prop_assert_eq!((windows.precipitation_end - input).num_days(), 3);

        let days = (windows.precipitation_end - windows.precipitation_start).num_days() + 1;
        prop_assert_eq!(days * 24, PRECIPITATION_PERIOD_HOURS);
    }

    /// The daily fetch range is the input date itself; the hourly fetch
    /// range is the precipitation window
    #[test]
    fn prop_fetch_ranges_follow_windows(input in date_strategy()) {
        let windows = ForecastWindows::for_input(input);

        prop_assert_eq!(windows.daily_fetch_range(), (input, input));
        prop_assert_eq!(
            windows.hourly_fetch_range(),
            (windows.precipitation_start, windows.precipitation_end)
        );
    }

    /// A complete observation always yields a vector with the schema's
    /// arity, in schema order
    #[test]
    fn prop_rain_vector_matches_schema(values in prop::array::uniform13(value_strategy())) {
        let observation = daily_from_values(date(2023, 6, 15), &values);
        let vector = build_rain_features(&observation).unwrap();

        prop_assert_eq!(vector.len(), RAIN_FEATURE_FIELDS.len());
        for (i, value) in values.iter().enumerate() {
            prop_assert_eq!(vector.values()[i], *value);
        }
    }

    /// Feature extraction is deterministic for fixed input
    #[test]
    fn prop_rain_vector_deterministic(values in prop::array::uniform13(value_strategy())) {
        let observation = daily_from_values(date(2023, 6, 15), &values);

        let first = build_rain_features(&observation).unwrap();
        let second = build_rain_features(&observation).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Removing any single schema field fails extraction with that exact
    /// field named; nothing is substituted
    #[test]
    fn prop_any_missing_field_fails(
        values in prop::array::uniform13(value_strategy()),
        index in 0usize..13,
    ) {
        let mut observation = daily_from_values(date(2023, 6, 15), &values);
        let field = RAIN_FEATURE_FIELDS[index];
        clear_daily_field(&mut observation, field);

        prop_assert_eq!(
            build_rain_features(&observation),
            Err(FeatureError::MissingField(field))
        );
    }

    /// The precipitation vector always comes from the first record of
    /// the window
    #[test]
    fn prop_precipitation_vector_uses_window_start(
        first in prop::array::uniform14(value_strategy()),
        second in prop::array::uniform14(value_strategy()),
    ) {
        let start = date(2023, 6, 16).and_hms_opt(0, 0, 0).unwrap();
        let next = date(2023, 6, 16).and_hms_opt(1, 0, 0).unwrap();
        let series = vec![
            hourly_from_values(start, &first),
            hourly_from_values(next, &second),
        ];

        let vector = build_precipitation_features(&series).unwrap();
        prop_assert_eq!(vector.len(), PRECIPITATION_FEATURE_FIELDS.len());
        for (i, value) in first.iter().enumerate() {
            prop_assert_eq!(vector.values()[i], *value);
        }
    }
}
