//! Business logic services for the Weather Prediction API

pub mod engine;
pub mod forecast;

pub use engine::PredictionEngine;
pub use forecast::ForecastService;
