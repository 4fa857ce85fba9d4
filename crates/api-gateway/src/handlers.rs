//! API route handlers

use std::collections::BTreeMap;

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use common::models::{PredictionStatus, ValidationReport};
use common::types::ValidationMode;
use inference_engine::ModelInfo;

use crate::error::ApiError;
use crate::routes::AppState;

/// API version reported by the informational endpoints
pub const API_VERSION: &str = "1.0.0";

/// Body of `POST /predict`
#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    /// Feature values in training order
    pub features: Vec<f64>,

    /// Overrides the configured validation mode
    #[serde(default)]
    pub validation: Option<ValidationMode>,
}

/// Body of a successful prediction
#[derive(Debug, Serialize, Deserialize)]
pub struct PredictResponse {
    pub prediction: f64,
    pub input_features: Vec<f64>,
    pub feature_names: Vec<String>,
    pub status: PredictionStatus,
}

/// Body of `POST /validate`
#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    /// Feature values in training order
    pub features: Vec<f64>,
}

/// Body of `GET /` and `GET /api/`
#[derive(Debug, Serialize)]
pub struct ApiInfo {
    pub message: &'static str,
    pub model_loaded: bool,
    pub version: &'static str,
    pub model_path: String,
    pub model_exists: bool,
    pub endpoints: BTreeMap<&'static str, &'static str>,
}

/// `GET /` — service information
pub async fn root(State(state): State<AppState>) -> Json<ApiInfo> {
    let store = state.service.store();
    let model_exists = tokio::fs::try_exists(store.source()).await.unwrap_or(false);

    let endpoints = BTreeMap::from([
        ("health", "/health"),
        ("predict", "/predict"),
        ("validate", "/validate"),
        ("model_info", "/model-info"),
    ]);

    Json(ApiInfo {
        message: "Welcome to the Global Temperature Anomaly Prediction API",
        model_loaded: store.is_loaded(),
        version: API_VERSION,
        model_path: store.source().display().to_string(),
        model_exists,
        endpoints,
    })
}

/// `GET /health` — liveness probe
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "alive",
        "version": API_VERSION,
        "model_loaded": state.service.store().is_loaded(),
    }))
}

/// `POST /predict` — predict the anomaly for one feature vector
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let Json(request) = payload?;
    let mode = request
        .validation
        .unwrap_or_else(|| state.service.default_mode());

    let result = state.service.handle_with_mode(&request.features, mode)?;

    Ok(Json(PredictResponse {
        prediction: result.value,
        input_features: result.echoed_input.to_vec(),
        feature_names: common::models::feature_names()
            .into_iter()
            .map(String::from)
            .collect(),
        status: result.status,
    }))
}

/// `POST /validate` — report every problem with a feature vector
pub async fn validate(
    State(state): State<AppState>,
    payload: Result<Json<ValidateRequest>, JsonRejection>,
) -> Result<Json<ValidationReport>, ApiError> {
    let Json(request) = payload?;
    Ok(Json(state.service.validate(&request.features)))
}

/// `GET /model-info` — feature schema and model state
pub async fn model_info(State(state): State<AppState>) -> Json<ModelInfo> {
    Json(state.service.model_info())
}
