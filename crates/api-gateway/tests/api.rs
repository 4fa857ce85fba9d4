use std::path::PathBuf;
use std::sync::Arc;

use api_gateway::{build_router, AppState};
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use inference_engine::PredictionService;
use model_manager::ModelStore;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn app_with_artifact(contents: &str) -> (Router, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("best_model.json");
    std::fs::write(&path, contents).expect("write artifact");

    let store = ModelStore::open(path).await;
    let service = PredictionService::new(Arc::new(store));
    (build_router(AppState::new(service)), dir)
}

async fn sum_model_app() -> (Router, tempfile::TempDir) {
    app_with_artifact(r#"{"format_version": 1, "model": {"coef": [1, 1, 1, 1], "intercept": 0.0}}"#).await
}

async fn unloaded_app() -> Router {
    let store = ModelStore::open(PathBuf::from("/nonexistent/best_model.json")).await;
    build_router(AppState::new(PredictionService::new(Arc::new(store))))
}

async fn send(app: Router, method: Method, uri: &str, body: Option<String>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(body) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(body)
        }
        None => Body::empty(),
    };

    let response = app
        .oneshot(builder.body(body).expect("request"))
        .await
        .expect("response");

    let status = response.status();
    let bytes = hyper::body::to_bytes(response.into_body())
        .await
        .expect("read body");
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (status, json)
}

async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(body.to_string())).await
}

#[tokio::test]
async fn predict_returns_sum_of_inputs() {
    let (app, _dir) = sum_model_app().await;
    let (status, body) = post_json(app, "/predict", json!({ "features": [0.5, 0.3, 0.2, 0.1] })).await;

    assert_eq!(status, StatusCode::OK);
    assert!((body["prediction"].as_f64().unwrap() - 1.1).abs() < 1e-12);
    assert_eq!(body["input_features"], json!([0.5, 0.3, 0.2, 0.1]));
    assert_eq!(body["status"], "success");
    assert_eq!(body["feature_names"][0], "co2_concentration");
}

#[tokio::test]
async fn predict_with_wrong_arity_is_bad_request() {
    let (app, _dir) = sum_model_app().await;
    let (status, body) = post_json(app, "/predict", json!({ "features": [0.5, 0.3] })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["kind"], "VALIDATION_FAILED");
    assert!(body["error"]["index"].is_null());
}

#[tokio::test]
async fn predict_out_of_range_names_feature() {
    let (app, _dir) = sum_model_app().await;
    let (status, body) = post_json(app, "/predict", json!({ "features": [1.5, 0.3, 0.2, 0.1] })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["index"], 0);
    assert_eq!(body["error"]["feature"], "co2_concentration");
    assert_eq!(body["error"]["violations"][0]["value"], 1.5);
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("CO2 Concentration"));
}

#[tokio::test]
async fn predict_exhaustive_mode_lists_all_violations() {
    let (app, _dir) = sum_model_app().await;
    let (status, body) = post_json(
        app,
        "/predict",
        json!({ "features": [1.5, -0.3, 0.2, 0.1], "validation": "exhaustive" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["violations"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn malformed_json_is_unprocessable() {
    let (app, _dir) = sum_model_app().await;
    let (status, body) = send(app, Method::POST, "/predict", Some("{\"features\": [0.5,".to_string())).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["kind"], "INVALID_REQUEST");
}

#[tokio::test]
async fn non_numeric_feature_is_unprocessable() {
    let (app, _dir) = sum_model_app().await;
    let (status, _) = post_json(app, "/predict", json!({ "features": [0.5, "hot", 0.2, 0.1] })).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn missing_model_yields_service_unavailable() {
    let app = unloaded_app().await;
    let (status, body) = post_json(app, "/predict", json!({ "features": [0.5, 0.3, 0.2, 0.1] })).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["kind"], "MODEL_UNAVAILABLE");
    assert_eq!(
        body["error"]["message"],
        "Model not loaded. Please check server logs."
    );
}

#[tokio::test]
async fn model_info_works_without_model() {
    let app = unloaded_app().await;
    let (status, body) = send(app, Method::GET, "/model-info", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["model_loaded"], false);
    assert_eq!(body["features"].as_array().unwrap().len(), 4);
    assert_eq!(body["features"][2]["name"], "ocean_temperature");
    assert_eq!(body["features"][2]["max"], 1.0);
    assert!(body["load_error"].as_str().unwrap().contains("not found"));
}

#[tokio::test]
async fn shape_mismatch_is_bad_request() {
    let (app, _dir) = app_with_artifact(r#"{"coef": [1, 1, 1], "intercept": 0}"#).await;
    let (status, body) = post_json(app, "/predict", json!({ "features": [0.5, 0.3, 0.2, 0.1] })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["kind"], "INFERENCE_FAILED");
    assert_eq!(body["error"]["input_features"], json!([0.5, 0.3, 0.2, 0.1]));
}

#[tokio::test]
async fn non_finite_prediction_is_internal_error() {
    let (app, _dir) = app_with_artifact(r#"{"coef": [1e308, 1e308, 1e308, 1e308], "intercept": 0}"#).await;
    let (status, body) = post_json(app, "/predict", json!({ "features": [1.0, 1.0, 1.0, 1.0] })).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["kind"], "INFERENCE_FAILED");
    assert_eq!(body["error"]["input_features"], json!([1.0, 1.0, 1.0, 1.0]));
}

#[tokio::test]
async fn validate_reports_each_feature() {
    let (app, _dir) = sum_model_app().await;
    let (status, body) = post_json(app, "/validate", json!({ "features": [0.5, 1.3, 0.2, -1.0] })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["features"][0]["in_range"], true);
    assert_eq!(body["features"][1]["in_range"], false);
    assert_eq!(body["features"][1]["value"], 1.3);
    assert_eq!(body["errors"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn validate_valid_vector_has_null_errors() {
    let (app, _dir) = sum_model_app().await;
    let (status, body) = post_json(app, "/validate", json!({ "features": [0.5, 0.3, 0.2, 0.1] })).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["errors"].is_null());
}

#[tokio::test]
async fn root_reports_model_state() {
    let (app, _dir) = sum_model_app().await;
    let (status, body) = send(app.clone(), Method::GET, "/", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["model_loaded"], true);
    assert_eq!(body["model_exists"], true);
    assert_eq!(body["version"], "1.0.0");

    let (status, api) = send(app, Method::GET, "/api/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(api["model_path"], body["model_path"]);
}

#[tokio::test]
async fn health_is_always_ok() {
    let app = unloaded_app().await;
    let (status, body) = send(app, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "alive");
    assert_eq!(body["model_loaded"], false);
}
