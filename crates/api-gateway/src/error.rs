//! API error responses

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use tracing::{error, warn};

use common::error::{ErrorKind, ServiceError};

/// Failure returned by a handler
#[derive(Debug)]
pub enum ApiError {
    /// Structured failure from the prediction service
    Service(ServiceError),

    /// The request body could not be parsed
    InvalidRequest(String),
}

impl ApiError {
    /// Machine-checkable kind
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Service(err) => err.kind(),
            ApiError::InvalidRequest(_) => ErrorKind::InvalidRequest,
        }
    }

    /// HTTP status for the failure
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Service(ServiceError::ValidationFailed(_)) => StatusCode::BAD_REQUEST,
            ApiError::Service(ServiceError::ModelUnavailable) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Service(err @ ServiceError::InferenceFailed { .. }) => {
                if err.is_caller_error() {
                    StatusCode::BAD_REQUEST
                } else {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            }
            ApiError::InvalidRequest(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    fn body(&self) -> Value {
        let mut body = json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });

        match self {
            ApiError::Service(ServiceError::ValidationFailed(validation)) => {
                body["index"] = json!(validation.index());
                body["feature"] = json!(validation.violations().first().map(|v| &v.feature));
                body["violations"] = json!(validation.violations());
            }
            ApiError::Service(ServiceError::InferenceFailed { input, .. }) => {
                body["input_features"] = json!(input);
            }
            _ => {}
        }

        json!({ "error": body })
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Service(err) => write!(f, "{}", err),
            ApiError::InvalidRequest(msg) => write!(f, "{}", msg),
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        ApiError::Service(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            error!(kind = %self.kind(), "Request failed: {}", self);
        } else {
            warn!(kind = %self.kind(), "Request rejected: {}", self);
        }

        (status, Json(self.body())).into_response()
    }
}
