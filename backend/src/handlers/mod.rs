//! HTTP handlers for the Weather Prediction API

pub mod forecast;
pub mod health;

pub use forecast::{predict_precipitation, predict_rain};
pub use health::health_check;
