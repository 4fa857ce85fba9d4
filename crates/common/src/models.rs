//! Common data models for the anomaly prediction service
//!
//! This module defines the feature schema the model was trained on and the
//! request/response data structures exchanged with the prediction service.

use serde::{Deserialize, Serialize};

/// Number of features the model consumes
pub const FEATURE_ARITY: usize = 4;

/// Unit label of the predicted value
pub const OUTPUT_UNIT: &str = "°C (temperature anomaly)";

/// Description of one input feature
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureSpec {
    /// Canonical snake_case name
    pub name: &'static str,
    /// Human-readable label used in error messages
    pub label: &'static str,
    /// Inclusive lower bound
    pub min: f64,
    /// Inclusive upper bound
    pub max: f64,
}

impl FeatureSpec {
    /// Returns true if the value lies in `[min, max]` (NaN never does)
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Message used when `value` falls outside the range
    pub fn range_message(&self, value: f64) -> String {
        format!(
            "{} must be between {} and {}, got {}",
            self.label, self.min, self.max, value
        )
    }
}

/// Features in training order
pub const FEATURES: [FeatureSpec; FEATURE_ARITY] = [
    FeatureSpec {
        name: "co2_concentration",
        label: "CO2 Concentration",
        min: 0.0,
        max: 1.0,
    },
    FeatureSpec {
        name: "solar_activity",
        label: "Solar Activity",
        min: 0.0,
        max: 1.0,
    },
    FeatureSpec {
        name: "ocean_temperature",
        label: "Ocean Temperature",
        min: 0.0,
        max: 1.0,
    },
    FeatureSpec {
        name: "atmospheric_pressure",
        label: "Atmospheric Pressure",
        min: 0.0,
        max: 1.0,
    },
];

/// Canonical feature names in training order
pub fn feature_names() -> Vec<&'static str> {
    FEATURES.iter().map(|f| f.name).collect()
}

/// Ordered, fixed-arity feature vector
///
/// The arity is enforced by the type; range checks are the prediction
/// service's job.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector([f64; FEATURE_ARITY]);

impl FeatureVector {
    /// Creates a feature vector from values in training order
    pub fn new(values: [f64; FEATURE_ARITY]) -> Self {
        Self(values)
    }

    /// Converts a slice, returning `None` unless it has exactly the arity
    pub fn from_slice(values: &[f64]) -> Option<Self> {
        <[f64; FEATURE_ARITY]>::try_from(values).ok().map(Self)
    }

    /// Values in training order
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Values as an owned vector
    pub fn to_vec(&self) -> Vec<f64> {
        self.0.to_vec()
    }
}

/// Status marker of a successful prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionStatus {
    /// The model produced a value
    Success,
}

/// Result of one successful prediction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    /// Predicted anomaly, unrounded
    pub value: f64,
    /// Input exactly as received
    pub echoed_input: FeatureVector,
    /// Always `success`
    pub status: PredictionStatus,
}

impl PredictionResult {
    /// Creates a successful result
    pub fn success(value: f64, echoed_input: FeatureVector) -> Self {
        Self {
            value,
            echoed_input,
            status: PredictionStatus::Success,
        }
    }
}

/// Per-feature outcome of exhaustive validation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureCheck {
    /// Position in the submitted vector
    pub index: usize,
    /// Feature name, `None` for values past the model's arity
    pub name: Option<&'static str>,
    /// Submitted value
    pub value: f64,
    /// Whether the value lies in the feature's range
    pub in_range: bool,
}

/// Result of exhaustive validation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    /// One entry per submitted value
    pub features: Vec<FeatureCheck>,
    /// Human-readable errors, `None` when the vector is valid
    pub errors: Option<Vec<String>>,
}

impl ValidationReport {
    /// Returns true if no error was found
    pub fn is_valid(&self) -> bool {
        self.errors.is_none()
    }
}
