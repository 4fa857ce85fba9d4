//! Prediction orchestration for the anomaly prediction service
//!
//! This crate validates incoming feature vectors against the feature schema,
//! invokes the model store, and maps every outcome to a structured result.

pub mod engine;
pub mod info;
pub mod validation;

// Re-export commonly used types
pub use engine::PredictionService;
pub use info::ModelInfo;
pub use validation::{validate_exhaustive, validate_features};
