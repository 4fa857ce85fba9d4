//! Common utilities and types for the anomaly prediction service
//!
//! This crate provides shared functionality used across the service,
//! including the feature schema, request/response data structures,
//! the error taxonomy and small utility functions.

pub mod error;
pub mod models;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use error::{Error, Result};
pub use models::*;
pub use types::*;
