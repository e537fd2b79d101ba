//! Models for the Weather Prediction API
//!
//! Re-exports domain models from the shared crate and adds the
//! backend-specific model artifact types.

pub mod artifact;

pub use artifact::*;
pub use shared::models::*;
