//! Model artifact loader
//!
//! Reads the serialized artifact, detects which model shape it holds by
//! inspecting the fields present, and validates the parameters.
//!
//! Accepted documents:
//!
//! ```json
//! { "format_version": 1, "feature_names": [...], "model": { "coef": [...], "intercept": 0.0 } }
//! { "format_version": 1, "model": { "theta": [...], "mean": 0.5, "std": [...] } }
//! ```
//!
//! A bare model object without the envelope is read as format version 1.

use std::path::Path;

use chrono::Utc;
use serde::Deserialize;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use common::error::LoadError;
use common::models::FEATURES;

use crate::artifact::{ensure_finite, FittedModel, LinearParams, ModelArtifact, ModelKind, Regressor};
use crate::metadata::ArtifactMetadata;

/// Artifact format version this loader understands
pub const SUPPORTED_FORMAT_VERSION: u32 = 1;

/// Either a single value applied to every feature or one value per feature
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PerFeature {
    Scalar(f64),
    Vector(Vec<f64>),
}

impl PerFeature {
    fn expand(self, n: usize, field: &str) -> Result<Vec<f64>, LoadError> {
        match self {
            PerFeature::Scalar(value) => Ok(vec![value; n]),
            PerFeature::Vector(values) if values.len() == n => Ok(values),
            PerFeature::Vector(values) => Err(LoadError::InvalidParameters(format!(
                "{} has {} entries but theta describes {} features",
                field,
                values.len(),
                n
            ))),
        }
    }
}

#[derive(Debug, Deserialize)]
struct LinearParamsDoc {
    theta: Vec<f64>,
    mean: PerFeature,
    std: PerFeature,
}

#[derive(Debug, Deserialize)]
struct FittedModelDoc {
    #[serde(alias = "coef_")]
    coef: Vec<f64>,
    #[serde(alias = "intercept_", default)]
    intercept: f64,
}

/// Reads and parses the artifact at `path`
pub async fn load(path: &Path) -> Result<ModelArtifact, LoadError> {
    debug!("Reading model artifact from {:?}", path);

    let bytes = tokio::fs::read(path).await.map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            LoadError::Missing {
                path: path.to_path_buf(),
            }
        } else {
            LoadError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    parse_artifact(path, &bytes)
}

/// Parses artifact bytes previously read from `path`
pub fn parse_artifact(path: &Path, bytes: &[u8]) -> Result<ModelArtifact, LoadError> {
    let corrupt = |reason: String| LoadError::Corrupt {
        path: path.to_path_buf(),
        reason,
    };

    let document: Value = serde_json::from_slice(bytes).map_err(|e| corrupt(e.to_string()))?;
    let Value::Object(mut root) = document else {
        return Err(corrupt("expected a JSON object at the top level".to_string()));
    };

    // Envelope or bare model
    let (format_version, feature_names, model) = match root.remove("model") {
        Some(Value::Object(model)) => {
            let version = read_format_version(&root).map_err(corrupt)?;
            let names = read_feature_names(&root).map_err(corrupt)?;
            (version, names, model)
        }
        Some(_) => return Err(corrupt("\"model\" must be an object".to_string())),
        None => (SUPPORTED_FORMAT_VERSION, None, root),
    };

    if format_version != SUPPORTED_FORMAT_VERSION {
        return Err(LoadError::UnsupportedVersion {
            found: format_version,
            supported: SUPPORTED_FORMAT_VERSION,
        });
    }

    let model = detect_model(path, model)?;

    if let Some(names) = &feature_names {
        check_feature_names(names, model.n_features())?;
    }

    let metadata = ArtifactMetadata {
        source: path.to_path_buf(),
        format_version,
        kind: model.kind(),
        n_features: model.n_features(),
        feature_names,
        sha256: hex::encode(Sha256::digest(bytes)),
        size_bytes: bytes.len() as u64,
        loaded_at: Utc::now(),
    };

    info!(
        kind = %metadata.kind,
        n_features = metadata.n_features,
        sha256 = %metadata.sha256,
        "Parsed model artifact {:?}", path
    );

    Ok(ModelArtifact::new(model, metadata))
}

fn read_format_version(root: &Map<String, Value>) -> Result<u32, String> {
    match root.get("format_version") {
        None => Ok(SUPPORTED_FORMAT_VERSION),
        Some(value) => value
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| format!("format_version must be a non-negative integer, got {}", value)),
    }
}

fn read_feature_names(root: &Map<String, Value>) -> Result<Option<Vec<String>>, String> {
    match root.get("feature_names") {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value.clone())
            .map(Some)
            .map_err(|e| format!("feature_names: {}", e)),
    }
}

/// Picks the model shape from the fields present
fn detect_model(path: &Path, model: Map<String, Value>) -> Result<ModelKind, LoadError> {
    let has_params = model.contains_key("theta");
    let has_fitted = model.contains_key("coef") || model.contains_key("coef_");
    let corrupt = |reason: String| LoadError::Corrupt {
        path: path.to_path_buf(),
        reason,
    };

    match (has_params, has_fitted) {
        (true, true) => Err(corrupt(
            "ambiguous model: both \"theta\" and \"coef\" are present".to_string(),
        )),
        (true, false) => {
            let doc: LinearParamsDoc = serde_json::from_value(Value::Object(model))
                .map_err(|e| corrupt(format!("parameter bundle: {}", e)))?;
            build_linear_params(doc).map(ModelKind::LinearParams)
        }
        (false, true) => {
            let doc: FittedModelDoc = serde_json::from_value(Value::Object(model))
                .map_err(|e| corrupt(format!("fitted model: {}", e)))?;
            build_fitted_model(doc).map(ModelKind::FittedModel)
        }
        (false, false) => Err(corrupt(
            "unrecognised model structure: expected \"coef\" or \"theta\"".to_string(),
        )),
    }
}

fn build_linear_params(doc: LinearParamsDoc) -> Result<LinearParams, LoadError> {
    let n = doc.theta.len().saturating_sub(1);
    let mean = doc.mean.expand(n, "mean")?;
    let std = doc.std.expand(n, "std")?;

    LinearParams::try_new(doc.theta, mean, std)
}

fn build_fitted_model(doc: FittedModelDoc) -> Result<FittedModel, LoadError> {
    if doc.coef.is_empty() {
        return Err(LoadError::InvalidParameters(
            "coef must not be empty".to_string(),
        ));
    }
    ensure_finite(&doc.coef, "coef")?;
    ensure_finite(&[doc.intercept], "intercept")?;

    Ok(FittedModel::new(doc.coef, doc.intercept))
}

fn check_feature_names(names: &[String], n_features: usize) -> Result<(), LoadError> {
    if names.len() != n_features {
        return Err(LoadError::InvalidParameters(format!(
            "artifact lists {} feature names for a model with {} features",
            names.len(),
            n_features
        )));
    }

    let canonical = FEATURES.iter().map(|f| f.name);
    if names.len() != FEATURES.len() || !names.iter().map(String::as_str).eq(canonical) {
        warn!(
            "Artifact feature names {:?} differ from the service's feature order",
            names
        );
    }

    Ok(())
}
