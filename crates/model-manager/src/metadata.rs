//! Model artifact metadata
//!
//! Metadata is captured once when an artifact is loaded and reported by the
//! service's informational endpoints.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Structural shape of an artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    /// `{theta, mean, std}` parameter bundle
    LinearParams,
    /// Fitted regressor with `coef` and `intercept`
    FittedModel,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::LinearParams => write!(f, "linear_params"),
            ArtifactKind::FittedModel => write!(f, "fitted_model"),
        }
    }
}

/// Facts recorded about a loaded artifact
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtifactMetadata {
    /// Where the artifact was read from
    pub source: PathBuf,

    /// Format version declared by the producer
    pub format_version: u32,

    /// Detected model shape
    pub kind: ArtifactKind,

    /// Number of features the model expects
    pub n_features: usize,

    /// Feature names recorded by the producer, if any
    pub feature_names: Option<Vec<String>>,

    /// SHA-256 digest of the artifact bytes, lowercase hex
    pub sha256: String,

    /// Artifact size in bytes
    pub size_bytes: u64,

    /// Load timestamp
    pub loaded_at: DateTime<Utc>,
}
