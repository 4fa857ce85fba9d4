//! Model representations behind the predict contract
//!
//! Two artifact shapes are supported. A [`FittedModel`] is a fitted linear
//! regressor that predicts directly on a feature matrix. A [`LinearParams`]
//! bundle carries normalisation statistics and a coefficient vector whose
//! first entry is the intercept. Both implement [`Regressor`]; which one an
//! artifact holds is decided once at load time and never changes.

use ndarray::{Array1, Array2, ArrayView2};

use common::error::{InferenceError, LoadError};
use common::models::FeatureVector;

use crate::metadata::{ArtifactKind, ArtifactMetadata};

/// Predict-on-matrix capability shared by every model shape
pub trait Regressor: Send + Sync {
    /// Number of columns the model expects
    fn n_features(&self) -> usize;

    /// Predicts one value per row of `x`
    fn predict_matrix(&self, x: ArrayView2<'_, f64>) -> Result<Array1<f64>, InferenceError>;
}

fn check_shape(x: &ArrayView2<'_, f64>, expected: usize) -> Result<(), InferenceError> {
    if x.ncols() != expected {
        return Err(InferenceError::ShapeMismatch {
            expected,
            actual: x.ncols(),
        });
    }
    Ok(())
}

pub(crate) fn ensure_finite(values: &[f64], field: &str) -> Result<(), LoadError> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(LoadError::InvalidParameters(format!(
            "{} contains non-finite values",
            field
        )))
    }
}

/// Fitted linear regressor: `y = X · coef + intercept`
#[derive(Debug, Clone, PartialEq)]
pub struct FittedModel {
    coef: Array1<f64>,
    intercept: f64,
}

impl FittedModel {
    /// Creates a fitted model from its coefficients and intercept
    pub fn new(coef: Vec<f64>, intercept: f64) -> Self {
        Self {
            coef: Array1::from(coef),
            intercept,
        }
    }

    /// Coefficients, one per feature
    pub fn coef(&self) -> &Array1<f64> {
        &self.coef
    }

    /// Intercept term
    pub fn intercept(&self) -> f64 {
        self.intercept
    }
}

impl Regressor for FittedModel {
    fn n_features(&self) -> usize {
        self.coef.len()
    }

    fn predict_matrix(&self, x: ArrayView2<'_, f64>) -> Result<Array1<f64>, InferenceError> {
        check_shape(&x, self.coef.len())?;
        Ok(x.dot(&self.coef) + self.intercept)
    }
}

/// Parameter bundle: normalise, prepend an intercept term of 1, dot with `theta`
#[derive(Debug, Clone, PartialEq)]
pub struct LinearParams {
    theta: Array1<f64>,
    mean: Array1<f64>,
    std: Array1<f64>,
}

impl LinearParams {
    /// Creates a parameter bundle
    ///
    /// `theta` has one entry more than `mean` and `std`; its first entry
    /// multiplies the intercept term. Every value must be finite and `std`
    /// must not contain zeros.
    pub fn try_new(theta: Vec<f64>, mean: Vec<f64>, std: Vec<f64>) -> Result<Self, LoadError> {
        if theta.len() < 2 {
            return Err(LoadError::InvalidParameters(
                "theta needs an intercept and at least one coefficient".to_string(),
            ));
        }

        let n = theta.len() - 1;
        for (field, values) in [("mean", &mean), ("std", &std)] {
            if values.len() != n {
                return Err(LoadError::InvalidParameters(format!(
                    "{} has {} entries but theta describes {} features",
                    field,
                    values.len(),
                    n
                )));
            }
        }

        ensure_finite(&theta, "theta")?;
        ensure_finite(&mean, "mean")?;
        ensure_finite(&std, "std")?;

        if std.iter().any(|s| *s == 0.0) {
            return Err(LoadError::InvalidParameters(
                "std must not contain zeros".to_string(),
            ));
        }

        Ok(Self {
            theta: Array1::from(theta),
            mean: Array1::from(mean),
            std: Array1::from(std),
        })
    }

    /// Coefficients, intercept first
    pub fn theta(&self) -> &Array1<f64> {
        &self.theta
    }

    /// Per-feature normalisation mean
    pub fn mean(&self) -> &Array1<f64> {
        &self.mean
    }

    /// Per-feature normalisation standard deviation
    pub fn std(&self) -> &Array1<f64> {
        &self.std
    }
}

impl Regressor for LinearParams {
    fn n_features(&self) -> usize {
        self.theta.len().saturating_sub(1)
    }

    fn predict_matrix(&self, x: ArrayView2<'_, f64>) -> Result<Array1<f64>, InferenceError> {
        let n = self.n_features();
        check_shape(&x, n)?;

        let mut design = Array2::<f64>::ones((x.nrows(), n + 1));
        for ((row, col), value) in x.indexed_iter() {
            design[[row, col + 1]] = (value - self.mean[col]) / self.std[col];
        }

        Ok(design.dot(&self.theta))
    }
}

/// Model shape held by an artifact
#[derive(Debug, Clone, PartialEq)]
pub enum ModelKind {
    /// Normalisation statistics plus coefficient vector
    LinearParams(LinearParams),
    /// Fitted regressor predicting on a matrix
    FittedModel(FittedModel),
}

impl ModelKind {
    /// Label of the variant
    pub fn kind(&self) -> ArtifactKind {
        match self {
            ModelKind::LinearParams(_) => ArtifactKind::LinearParams,
            ModelKind::FittedModel(_) => ArtifactKind::FittedModel,
        }
    }
}

impl Regressor for ModelKind {
    fn n_features(&self) -> usize {
        match self {
            ModelKind::LinearParams(params) => params.n_features(),
            ModelKind::FittedModel(model) => model.n_features(),
        }
    }

    fn predict_matrix(&self, x: ArrayView2<'_, f64>) -> Result<Array1<f64>, InferenceError> {
        match self {
            ModelKind::LinearParams(params) => params.predict_matrix(x),
            ModelKind::FittedModel(model) => model.predict_matrix(x),
        }
    }
}

/// A loaded, immutable model artifact
#[derive(Debug, Clone)]
pub struct ModelArtifact {
    model: ModelKind,
    metadata: ArtifactMetadata,
}

impl ModelArtifact {
    /// Creates an artifact from a model and its metadata
    pub fn new(model: ModelKind, metadata: ArtifactMetadata) -> Self {
        Self { model, metadata }
    }

    /// Underlying model
    pub fn model(&self) -> &ModelKind {
        &self.model
    }

    /// Artifact metadata
    pub fn metadata(&self) -> &ArtifactMetadata {
        &self.metadata
    }

    /// Predicts a single value for one feature vector
    ///
    /// The vector is passed to the model in the order received, as a
    /// single-row matrix.
    pub fn predict(&self, features: &FeatureVector) -> Result<f64, InferenceError> {
        let values = features.as_slice();
        let row = ArrayView2::from_shape((1, values.len()), values).map_err(|_| {
            InferenceError::ShapeMismatch {
                expected: self.model.n_features(),
                actual: values.len(),
            }
        })?;

        let output = self.model.predict_matrix(row)?;
        let value = output[0];

        if !value.is_finite() {
            return Err(InferenceError::NonFinite { value });
        }

        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_fitted_model_sums_inputs() {
        let model = FittedModel::new(vec![1.0, 1.0, 1.0, 1.0], 0.0);
        let x = array![[0.5, 0.3, 0.2, 0.1], [0.0, 0.0, 0.0, 1.0]];
        let y = model.predict_matrix(x.view()).unwrap();
        assert!((y[0] - 1.1).abs() < 1e-12);
        assert!((y[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_fitted_model_rejects_wrong_width() {
        let model = FittedModel::new(vec![1.0, 2.0, 3.0], 0.5);
        let x = array![[0.5, 0.3, 0.2, 0.1]];
        assert_eq!(
            model.predict_matrix(x.view()),
            Err(InferenceError::ShapeMismatch { expected: 3, actual: 4 })
        );
    }

    #[test]
    fn test_linear_params_normalise_then_dot() {
        // theta = [bias, w1, w2]
        let params =
            LinearParams::try_new(vec![2.0, 3.0, -1.0], vec![0.5, 1.0], vec![0.5, 2.0]).unwrap();
        let x = array![[1.0, 3.0]];
        // normalised: [(1-0.5)/0.5, (3-1)/2] = [1, 1] -> 2 + 3 - 1
        let y = params.predict_matrix(x.view()).unwrap();
        assert!((y[0] - 4.0).abs() < 1e-12);
        assert_eq!(params.n_features(), 2);
    }

    #[test]
    fn test_model_kind_dispatch() {
        let kind = ModelKind::FittedModel(FittedModel::new(vec![2.0], 1.0));
        assert_eq!(kind.kind(), ArtifactKind::FittedModel);
        assert_eq!(kind.n_features(), 1);
        let y = kind.predict_matrix(array![[3.0]].view()).unwrap();
        assert_eq!(y[0], 7.0);
    }

    #[test]
    fn test_linear_params_rejects_short_normalisation() {
        let err = LinearParams::try_new(vec![0.0, 1.0, 1.0, 1.0, 1.0], vec![], vec![]).unwrap_err();
        assert!(matches!(err, LoadError::InvalidParameters(msg) if msg.starts_with("mean has 0 entries")));
    }

    #[test]
    fn test_linear_params_rejects_degenerate_values() {
        assert!(LinearParams::try_new(vec![1.0], vec![], vec![]).is_err());
        assert!(LinearParams::try_new(vec![0.0, 1.0], vec![0.5], vec![0.0]).is_err());
        assert!(LinearParams::try_new(vec![0.0, f64::NAN], vec![0.5], vec![1.0]).is_err());
        assert!(LinearParams::try_new(vec![0.0, 1.0], vec![f64::INFINITY], vec![1.0]).is_err());
    }

    #[test]
    fn test_overflowing_prediction_is_non_finite() {
        let model = ModelKind::FittedModel(FittedModel::new(vec![1e308; 4], 0.0));
        let metadata = ArtifactMetadata {
            source: std::path::PathBuf::from("best_model.json"),
            format_version: 1,
            kind: model.kind(),
            n_features: model.n_features(),
            feature_names: None,
            sha256: String::new(),
            size_bytes: 0,
            loaded_at: chrono::Utc::now(),
        };
        let artifact = ModelArtifact::new(model, metadata);
        let features = FeatureVector::new([1.0, 1.0, 1.0, 1.0]);
        assert!(matches!(
            artifact.predict(&features),
            Err(InferenceError::NonFinite { value }) if value.is_infinite()
        ));
    }
}
