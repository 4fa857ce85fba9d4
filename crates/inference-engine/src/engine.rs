//! Prediction service
//!
//! Each request goes `Received → Validated → Predicted → Responded`, or stops
//! at `Rejected` (validation) or `Failed` (model store). The service keeps no
//! state between requests; the store it wraps is shared read-only.

use std::sync::Arc;

use tracing::{debug, info, warn};

use common::error::{InferenceError, ServiceError};
use common::models::{PredictionResult, ValidationReport};
use common::types::ValidationMode;
use common::utils::{format_duration, measure_execution_time};
use model_manager::ModelStore;

use crate::info::ModelInfo;
use crate::validation::{validate_exhaustive, validate_features};

/// Validates requests and turns them into predictions
#[derive(Debug, Clone)]
pub struct PredictionService {
    /// Model store shared with every request
    store: Arc<ModelStore>,

    /// Validation mode used when a request does not ask for one
    default_mode: ValidationMode,
}

impl PredictionService {
    /// Creates a new prediction service using fail-fast validation
    pub fn new(store: Arc<ModelStore>) -> Self {
        Self {
            store,
            default_mode: ValidationMode::FailFast,
        }
    }

    /// Sets the validation mode used when a request does not ask for one
    pub fn with_default_mode(mut self, mode: ValidationMode) -> Self {
        self.default_mode = mode;
        self
    }

    /// Validation mode used when a request does not ask for one
    pub fn default_mode(&self) -> ValidationMode {
        self.default_mode
    }

    /// The wrapped model store
    pub fn store(&self) -> &Arc<ModelStore> {
        &self.store
    }

    /// Handles a prediction request with the default validation mode
    pub fn handle(&self, raw: &[f64]) -> Result<PredictionResult, ServiceError> {
        self.handle_with_mode(raw, self.default_mode)
    }

    /// Handles a prediction request
    ///
    /// An unloaded store short-circuits to `ModelUnavailable` before the
    /// input is looked at.
    pub fn handle_with_mode(
        &self,
        raw: &[f64],
        mode: ValidationMode,
    ) -> Result<PredictionResult, ServiceError> {
        if !self.store.is_loaded() {
            warn!("Prediction requested but no model is loaded");
            return Err(ServiceError::ModelUnavailable);
        }

        debug!(?raw, %mode, "Received input features");

        let features = validate_features(raw, mode).map_err(|e| {
            debug!("Rejected input: {}", e);
            ServiceError::from(e)
        })?;

        let (outcome, elapsed) = measure_execution_time(|| self.store.predict(&features));

        match outcome {
            Ok(value) => {
                info!(
                    prediction = value,
                    elapsed = %format_duration(elapsed),
                    "Generated prediction"
                );
                Ok(PredictionResult::success(value, features))
            }
            Err(InferenceError::ModelUnavailable) => Err(ServiceError::ModelUnavailable),
            Err(cause) => {
                warn!("Error making prediction: {}", cause);
                Err(ServiceError::InferenceFailed {
                    cause,
                    input: features.to_vec(),
                })
            }
        }
    }

    /// Validates a feature list exhaustively without predicting
    pub fn validate(&self, raw: &[f64]) -> ValidationReport {
        validate_exhaustive(raw)
    }

    /// Describes the served model
    pub fn model_info(&self) -> ModelInfo {
        ModelInfo::describe(&self.store)
    }
}
