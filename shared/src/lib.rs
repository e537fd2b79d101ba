//! Shared types and models for the Weather Prediction API
//!
//! This crate contains the domain model shared between the backend and any
//! other components of the system: raw weather observations, feature
//! schemas and vectors, forecast windows, and prediction results.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
