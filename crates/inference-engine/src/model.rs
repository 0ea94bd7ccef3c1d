//! Model Capabilities

use crate::InferenceError;
use feature_engine::{HealthFeatureVector, ValueFeatureRow};

/// Battery health classifier: one class index per feature vector
pub trait HealthClassifier: Send + Sync {
    fn classify(&self, features: &HealthFeatureVector) -> Result<usize, InferenceError>;
}

/// Value-for-money regressor
pub trait ValueRegressor: Send + Sync {
    /// Score a single feature row
    fn predict(&self, row: &ValueFeatureRow) -> Result<f64, InferenceError>;

    /// Column names the model was trained on, in input order.
    ///
    /// `None` when the artifact does not carry them; such a model cannot be
    /// fed from a request.
    fn feature_names(&self) -> Option<&[String]> {
        None
    }
}
