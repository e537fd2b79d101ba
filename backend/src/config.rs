//! Configuration management for the Weather Prediction API
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with WPA_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Weather provider configuration
    pub weather: WeatherConfig,

    /// Model artifact configuration
    pub models: ModelsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherConfig {
    /// Endpoint for historical observations
    pub archive_url: String,

    /// Endpoint for forward-looking observations
    pub forecast_url: String,

    /// Request timeout in seconds
    pub timeout_seconds: u64,

    /// Latitude of the serviced location
    pub latitude: f64,

    /// Longitude of the serviced location
    pub longitude: f64,

    /// Provider timezone for time-indexed responses
    pub timezone: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ModelsConfig {
    /// Directory holding model artifacts
    pub dir: String,

    /// Rain classifier artifact file name
    pub rain_classifier: String,

    /// Precipitation regressor artifact file name
    pub precipitation_regressor: String,
}

impl ModelsConfig {
    /// Path to the rain classifier artifact
    pub fn rain_classifier_path(&self) -> std::path::PathBuf {
        std::path::Path::new(&self.dir).join(&self.rain_classifier)
    }

    /// Path to the precipitation regressor artifact
    pub fn precipitation_regressor_path(&self) -> std::path::PathBuf {
        std::path::Path::new(&self.dir).join(&self.precipitation_regressor)
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("WPA_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 8001)?
            .set_default("server.host", "0.0.0.0")?
            .set_default(
                "weather.archive_url",
                "https://archive-api.open-meteo.com/v1/archive",
            )?
            .set_default(
                "weather.forecast_url",
                "https://api.open-meteo.com/v1/forecast",
            )?
            .set_default("weather.timeout_seconds", 10)?
            // Sydney, Australia
            .set_default("weather.latitude", -33.8678)?
            .set_default("weather.longitude", 151.2073)?
            .set_default("weather.timezone", "Australia/Sydney")?
            .set_default("models.dir", "models")?
            .set_default("models.rain_classifier", "rain_classifier.json")?
            .set_default(
                "models.precipitation_regressor",
                "precipitation_regressor.json",
            )?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (WPA_ prefix)
            .add_source(
                Environment::with_prefix("WPA")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = config.try_deserialize()?;

        shared::validate_coordinates(config.weather.latitude, config.weather.longitude)
            .map_err(|msg| ConfigError::Message(msg.to_string()))?;

        Ok(config)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8001,
            host: "0.0.0.0".to_string(),
        }
    }
}
