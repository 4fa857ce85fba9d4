//! Static model description

use serde::Serialize;

use common::models::{FeatureSpec, FEATURES, OUTPUT_UNIT};
use model_manager::{ArtifactKind, ModelStore};

/// Description of the served model, available whether or not it loaded
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelInfo {
    /// Features in training order with their ranges
    pub features: Vec<FeatureSpec>,

    /// Canonical feature names in training order
    pub feature_names: Vec<&'static str>,

    /// Whether the artifact is loaded
    pub model_loaded: bool,

    /// Unit of the predicted value
    pub output_unit: &'static str,

    /// Shape of the loaded artifact
    pub artifact_kind: Option<ArtifactKind>,

    /// Format version of the loaded artifact
    pub format_version: Option<u32>,

    /// SHA-256 digest of the loaded artifact
    pub sha256: Option<String>,

    /// Why the artifact failed to load
    pub load_error: Option<String>,
}

impl ModelInfo {
    /// Describes the model held by `store`
    pub fn describe(store: &ModelStore) -> Self {
        let metadata = store.metadata();

        Self {
            features: FEATURES.to_vec(),
            feature_names: FEATURES.iter().map(|f| f.name).collect(),
            model_loaded: store.is_loaded(),
            output_unit: OUTPUT_UNIT,
            artifact_kind: metadata.map(|m| m.kind),
            format_version: metadata.map(|m| m.format_version),
            sha256: metadata.map(|m| m.sha256.clone()),
            load_error: store.load_error().map(|e| e.to_string()),
        }
    }
}
