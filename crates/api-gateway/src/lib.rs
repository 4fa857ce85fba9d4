//! HTTP API for the anomaly prediction service
//!
//! This crate is the boundary between HTTP and the prediction service: it
//! parses requests, calls into [`inference_engine::PredictionService`] and
//! maps structured outcomes to status codes and JSON bodies.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/`, `/api/` | Service information |
//! | `GET`  | `/health` | Liveness probe |
//! | `POST` | `/predict` | Predict the anomaly for one feature vector |
//! | `POST` | `/validate` | Exhaustive validation report |
//! | `GET`  | `/model-info` | Feature schema and model state |

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod rest;
pub mod routes;

// Re-export commonly used types
pub use error::ApiError;
pub use rest::RestApi;
pub use routes::{build_router, AppState};
