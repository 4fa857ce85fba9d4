//! Feature vector validation
//!
//! The arity check always runs first. Range checks either stop at the first
//! violation (fail-fast) or collect every violation (exhaustive).

use common::error::{ValidationError, Violation};
use common::models::{FeatureCheck, FeatureSpec, FeatureVector, ValidationReport, FEATURES, FEATURE_ARITY};
use common::types::ValidationMode;

fn violation(index: usize, spec: &FeatureSpec, value: f64) -> Violation {
    Violation {
        index,
        feature: spec.name.to_string(),
        value,
        reason: spec.range_message(value),
    }
}

/// Validates a raw feature list, returning the typed vector on success
pub fn validate_features(raw: &[f64], mode: ValidationMode) -> Result<FeatureVector, ValidationError> {
    let features = FeatureVector::from_slice(raw).ok_or(ValidationError::WrongArity {
        expected: FEATURE_ARITY,
        actual: raw.len(),
    })?;

    let mut violations = Vec::new();

    for (index, (spec, value)) in FEATURES.iter().zip(raw.iter().copied()).enumerate() {
        if spec.contains(value) {
            continue;
        }

        violations.push(violation(index, spec, value));

        if mode == ValidationMode::FailFast {
            break;
        }
    }

    if violations.is_empty() {
        Ok(features)
    } else {
        Err(ValidationError::OutOfRange { violations })
    }
}

/// Checks every submitted value and reports all problems
pub fn validate_exhaustive(raw: &[f64]) -> ValidationReport {
    let mut errors = Vec::new();

    if raw.len() != FEATURE_ARITY {
        errors.push(
            ValidationError::WrongArity {
                expected: FEATURE_ARITY,
                actual: raw.len(),
            }
            .to_string(),
        );
    }

    let features: Vec<FeatureCheck> = raw
        .iter()
        .copied()
        .enumerate()
        .map(|(index, value)| match FEATURES.get(index) {
            Some(spec) => {
                let in_range = spec.contains(value);
                if !in_range {
                    errors.push(spec.range_message(value));
                }
                FeatureCheck {
                    index,
                    name: Some(spec.name),
                    value,
                    in_range,
                }
            }
            None => FeatureCheck {
                index,
                name: None,
                value,
                in_range: false,
            },
        })
        .collect();

    ValidationReport {
        features,
        errors: if errors.is_empty() { None } else { Some(errors) },
    }
}
