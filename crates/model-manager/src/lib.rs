//! Model artifact lifecycle management for the anomaly prediction service
//!
//! This crate owns the single trained regressor: it locates and reads the
//! serialized artifact, detects which model shape it holds, and exposes a
//! loaded/unloaded state plus a uniform predict operation.

pub mod artifact;
pub mod loader;
pub mod metadata;
pub mod store;

// Re-export commonly used types
pub use artifact::{FittedModel, LinearParams, ModelArtifact, ModelKind, Regressor};
pub use loader::{load, parse_artifact, SUPPORTED_FORMAT_VERSION};
pub use metadata::{ArtifactKind, ArtifactMetadata};
pub use store::{ModelStore, StoreState};
