//! Error types for the common crate
//!
//! This module defines the error taxonomy shared by the model store, the
//! prediction service and the HTTP boundary.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fixed diagnostic reported whenever the model artifact is not available
pub const MODEL_UNAVAILABLE_MESSAGE: &str = "Model not loaded. Please check server logs.";

/// Result type for startup operations
pub type Result<T> = std::result::Result<T, Error>;

/// Startup error type
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration could not be read or is invalid
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Failure to bring the model artifact into the loaded state
#[derive(Error, Debug)]
pub enum LoadError {
    /// No artifact at the configured location
    #[error("model artifact not found at {}", path.display())]
    Missing { path: PathBuf },

    /// The artifact exists but could not be read
    #[error("failed to read model artifact {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The artifact could not be deserialized or has an unknown structure
    #[error("model artifact {} is corrupt: {reason}", path.display())]
    Corrupt { path: PathBuf, reason: String },

    /// The artifact was written by an incompatible producer
    #[error("unsupported artifact format version {found} (supported: {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// The artifact parsed but its parameters cannot describe a model
    #[error("invalid model parameters: {0}")]
    InvalidParameters(String),
}

impl LoadError {
    /// Returns true if the artifact file was absent
    pub fn is_missing(&self) -> bool {
        matches!(self, LoadError::Missing { .. })
    }
}

/// Failure raised by the model store while computing a prediction
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InferenceError {
    /// The store holds no loaded artifact
    #[error("{}", MODEL_UNAVAILABLE_MESSAGE)]
    ModelUnavailable,

    /// The model rejected the shape of the input matrix
    #[error("X has {actual} features, but the model is expecting {expected} features as input")]
    ShapeMismatch { expected: usize, actual: usize },

    /// The computation produced NaN or an infinity
    #[error("model produced a non-finite prediction ({value})")]
    NonFinite { value: f64 },
}

impl InferenceError {
    /// Returns true if the failure was triggered by the caller's input
    /// rather than by the service itself
    pub fn is_input_related(&self) -> bool {
        matches!(self, InferenceError::ShapeMismatch { .. })
    }
}

/// A single out-of-range feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Position of the feature in the vector
    pub index: usize,

    /// Canonical feature name
    pub feature: String,

    /// Offending value
    pub value: f64,

    /// Human-readable reason
    pub reason: String,
}

/// Rejection of a feature vector before it reaches the model
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// The vector does not have exactly the model's arity
    #[error("wrong arity: expected {expected} features, got {actual}")]
    WrongArity { expected: usize, actual: usize },

    /// One or more features lie outside their allowed range
    #[error("{}", join_reasons(violations))]
    OutOfRange { violations: Vec<Violation> },
}

impl ValidationError {
    /// Short reason for the first problem found
    pub fn reason(&self) -> String {
        match self {
            ValidationError::WrongArity { .. } => "wrong arity".to_string(),
            ValidationError::OutOfRange { violations } => violations
                .first()
                .map(|v| v.reason.clone())
                .unwrap_or_default(),
        }
    }

    /// Index of the first offending feature, `None` for arity errors
    pub fn index(&self) -> Option<usize> {
        match self {
            ValidationError::WrongArity { .. } => None,
            ValidationError::OutOfRange { violations } => violations.first().map(|v| v.index),
        }
    }

    /// Every collected violation (empty for arity errors)
    pub fn violations(&self) -> &[Violation] {
        match self {
            ValidationError::WrongArity { .. } => &[],
            ValidationError::OutOfRange { violations } => violations,
        }
    }
}

fn join_reasons(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.reason.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Machine-checkable error kind carried by every failed response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Caller sent an invalid feature vector
    ValidationFailed,
    /// Model artifact is not loaded
    ModelUnavailable,
    /// Model computation failed
    InferenceFailed,
    /// Request body could not be parsed
    InvalidRequest,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::ValidationFailed => write!(f, "VALIDATION_FAILED"),
            ErrorKind::ModelUnavailable => write!(f, "MODEL_UNAVAILABLE"),
            ErrorKind::InferenceFailed => write!(f, "INFERENCE_FAILED"),
            ErrorKind::InvalidRequest => write!(f, "INVALID_REQUEST"),
        }
    }
}

/// Outcome of a failed prediction request
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServiceError {
    /// The model store is unloaded
    #[error("{}", MODEL_UNAVAILABLE_MESSAGE)]
    ModelUnavailable,

    /// The request was rejected before prediction
    #[error(transparent)]
    ValidationFailed(#[from] ValidationError),

    /// The model failed while computing; carries the echoed input
    #[error("Prediction error: {cause}")]
    InferenceFailed { cause: InferenceError, input: Vec<f64> },
}

impl ServiceError {
    /// Returns the machine-checkable kind
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::ModelUnavailable => ErrorKind::ModelUnavailable,
            ServiceError::ValidationFailed(_) => ErrorKind::ValidationFailed,
            ServiceError::InferenceFailed { .. } => ErrorKind::InferenceFailed,
        }
    }

    /// Returns true if the caller can fix the request and retry
    pub fn is_caller_error(&self) -> bool {
        match self {
            ServiceError::ModelUnavailable => false,
            ServiceError::ValidationFailed(_) => true,
            ServiceError::InferenceFailed { cause, .. } => cause.is_input_related(),
        }
    }
}
