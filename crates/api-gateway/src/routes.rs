//! Router construction

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;

use inference_engine::PredictionService;

use crate::{handlers, middleware};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Prediction service wrapping the shared model store
    pub service: PredictionService,
}

impl AppState {
    /// Creates the handler state
    pub fn new(service: PredictionService) -> Self {
        Self { service }
    }
}

/// Builds the API router with tracing and CORS layers
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/api", get(handlers::root))
        .route("/api/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/predict", post(handlers::predict))
        .route("/validate", post(handlers::validate))
        .route("/model-info", get(handlers::model_info))
        .layer(
            ServiceBuilder::new()
                .layer(middleware::trace())
                .layer(middleware::cors()),
        )
        .with_state(state)
}
