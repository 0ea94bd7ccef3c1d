//! Mock Models
//!
//! Deterministic stand-ins for development and tests, when no ONNX
//! artifacts are on disk.

use crate::model::{HealthClassifier, ValueRegressor};
use crate::InferenceError;
use feature_engine::{HealthFeatureVector, ValueFeatureRow};
use tracing::info;

/// Rule-based health classifier keyed on capacity retention.
///
/// Emits indices in the default label order: 0 Degraded, 1 Healthy,
/// 2 Moderate.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockHealthClassifier;

impl MockHealthClassifier {
    pub fn new() -> Self {
        info!("Creating mock health classifier");
        Self
    }
}

impl HealthClassifier for MockHealthClassifier {
    fn classify(&self, features: &HealthFeatureVector) -> Result<usize, InferenceError> {
        let retention = features.capacity_retention();
        let index = if retention > 90.0 {
            1
        } else if retention >= 75.0 {
            2
        } else {
            0
        };
        Ok(index)
    }
}

/// Regressor returning a fixed score
#[derive(Debug, Clone)]
pub struct MockValueRegressor {
    score: f64,
    feature_names: Option<Vec<String>>,
}

impl MockValueRegressor {
    /// Regressor without feature names
    pub fn new(score: f64) -> Self {
        info!(score, "Creating mock value regressor");
        Self {
            score,
            feature_names: None,
        }
    }

    /// Attach the training column names
    pub fn with_feature_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.feature_names = Some(names.into_iter().map(Into::into).collect());
        self
    }
}

impl ValueRegressor for MockValueRegressor {
    fn predict(&self, row: &ValueFeatureRow) -> Result<f64, InferenceError> {
        if let Some(names) = &self.feature_names {
            if row.len() != names.len() {
                return Err(InferenceError::InvalidInputShape {
                    expected: format!("[1, {}]", names.len()),
                    actual: format!("[1, {}]", row.len()),
                });
            }
        }
        Ok(self.score)
    }

    fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }
}
