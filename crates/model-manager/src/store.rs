//! Model store
//!
//! The store owns the single model artifact for the lifetime of the process.
//! It is built once at startup and shared read-only afterwards. A failed load
//! leaves the store unloaded for good; there is no retry.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{error, info};

use common::error::{InferenceError, LoadError};
use common::models::FeatureVector;

use crate::artifact::ModelArtifact;
use crate::loader;
use crate::metadata::ArtifactMetadata;

/// Load state of the store
#[derive(Debug)]
pub enum StoreState {
    /// An artifact is available for prediction
    Loaded(ModelArtifact),

    /// Loading failed; the cause is kept for diagnostics
    Unloaded(LoadError),
}

impl StoreState {
    /// Returns true if an artifact is available
    pub fn is_loaded(&self) -> bool {
        matches!(self, StoreState::Loaded(_))
    }
}

impl fmt::Display for StoreState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreState::Loaded(artifact) => write!(f, "Loaded ({})", artifact.metadata().kind),
            StoreState::Unloaded(cause) => write!(f, "Unloaded: {}", cause),
        }
    }
}

/// Owner of the model artifact lifecycle
#[derive(Debug)]
pub struct ModelStore {
    /// Configured artifact location
    source: PathBuf,

    /// Current state, fixed after construction
    state: StoreState,
}

impl ModelStore {
    /// Loads the artifact at `source`
    ///
    /// Never fails: a load error is logged and recorded, and the store is
    /// returned in the unloaded state.
    pub async fn open(source: impl Into<PathBuf>) -> Self {
        let source = source.into();
        info!("Looking for model at: {:?}", source);

        match loader::load(&source).await {
            Ok(artifact) => {
                info!(
                    kind = %artifact.metadata().kind,
                    "Model loaded successfully from {:?}", source
                );
                Self::from_artifact(source, artifact)
            }
            Err(cause) => {
                error!("Error loading model from {:?}: {}", source, cause);
                Self::unloaded(source, cause)
            }
        }
    }

    /// Creates a loaded store around an existing artifact
    pub fn from_artifact(source: impl Into<PathBuf>, artifact: ModelArtifact) -> Self {
        Self {
            source: source.into(),
            state: StoreState::Loaded(artifact),
        }
    }

    /// Creates an unloaded store recording why loading failed
    pub fn unloaded(source: impl Into<PathBuf>, cause: LoadError) -> Self {
        Self {
            source: source.into(),
            state: StoreState::Unloaded(cause),
        }
    }

    /// Returns true if an artifact is available
    pub fn is_loaded(&self) -> bool {
        self.state.is_loaded()
    }

    /// Configured artifact location
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Current state
    pub fn state(&self) -> &StoreState {
        &self.state
    }

    /// Loaded artifact, if any
    pub fn artifact(&self) -> Option<&ModelArtifact> {
        match &self.state {
            StoreState::Loaded(artifact) => Some(artifact),
            StoreState::Unloaded(_) => None,
        }
    }

    /// Metadata of the loaded artifact, if any
    pub fn metadata(&self) -> Option<&ArtifactMetadata> {
        self.artifact().map(ModelArtifact::metadata)
    }

    /// Why loading failed, if it did
    pub fn load_error(&self) -> Option<&LoadError> {
        match &self.state {
            StoreState::Loaded(_) => None,
            StoreState::Unloaded(cause) => Some(cause),
        }
    }

    /// Predicts the anomaly for one feature vector
    pub fn predict(&self, features: &FeatureVector) -> Result<f64, InferenceError> {
        match &self.state {
            StoreState::Loaded(artifact) => artifact.predict(features),
            StoreState::Unloaded(_) => Err(InferenceError::ModelUnavailable),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::ArtifactKind;

    fn write_artifact(dir: &tempfile::TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("best_model.json");
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[tokio::test]
    async fn test_open_loads_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_artifact(
            &dir,
            r#"{"format_version": 1, "model": {"coef": [1, 1, 1, 1], "intercept": 0}}"#,
        );

        let store = ModelStore::open(&path).await;
        assert!(store.is_loaded());
        assert!(store.load_error().is_none());
        assert_eq!(store.source(), path.as_path());
        assert_eq!(store.metadata().unwrap().kind, ArtifactKind::FittedModel);
        assert!(store.state().to_string().starts_with("Loaded"));

        let value = store.predict(&FeatureVector::new([0.5, 0.3, 0.2, 0.1])).unwrap();
        assert!((value - 1.1).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_missing_artifact_leaves_store_unloaded() {
        let dir = tempfile::tempdir().unwrap();
        let store = ModelStore::open(dir.path().join("absent.json")).await;

        assert!(!store.is_loaded());
        assert!(store.metadata().is_none());
        assert!(store.load_error().unwrap().is_missing());
        assert_eq!(
            store.predict(&FeatureVector::new([0.5, 0.3, 0.2, 0.1])),
            Err(InferenceError::ModelUnavailable)
        );
    }

    #[tokio::test]
    async fn test_corrupt_artifact_leaves_store_unloaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_artifact(&dir, "\u{80}\u{3}pickle");

        let store = ModelStore::open(&path).await;
        assert!(!store.is_loaded());
        assert!(matches!(store.load_error(), Some(LoadError::Corrupt { .. })));
    }

    #[tokio::test]
    async fn test_predict_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_artifact(
            &dir,
            r#"{"model": {"theta": [0.1, 0.4, -0.2, 0.3, 0.05], "mean": 0.5, "std": 0.29}}"#,
        );
        let store = ModelStore::open(&path).await;
        let features = FeatureVector::new([0.9, 0.1, 0.4, 0.6]);

        assert_eq!(store.predict(&features), store.predict(&features));
    }

    #[tokio::test]
    async fn test_overflowing_artifact_reports_non_finite() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_artifact(&dir, r#"{"coef": [1e308, 1e308, 1e308, 1e308], "intercept": 0}"#);

        let store = ModelStore::open(&path).await;
        assert!(store.is_loaded());
        assert!(matches!(
            store.predict(&FeatureVector::new([1.0, 1.0, 1.0, 1.0])),
            Err(InferenceError::NonFinite { value }) if value.is_infinite()
        ));
    }
}
