//! ONNX Inference Engine
//!
//! Loads the trained models with tract and exposes them behind small
//! capability traits so the HTTP layer never depends on a concrete backend.

mod engine;
mod labels;
pub mod mock;
mod model;
mod onnx;

pub use engine::{HealthPrediction, HealthPredictor, ValuePredictor};
pub use labels::{fallback_label, load_health_labels, LabelEncoder, DEFAULT_HEALTH_CLASSES, LABEL_COLUMN};
pub use model::{HealthClassifier, ValueRegressor};
pub use onnx::{OnnxHealthClassifier, OnnxValueRegressor};

use feature_engine::FeatureError;
use thiserror::Error;

/// Errors during inference
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Model load failed: {0}")]
    ModelLoadError(String),
    #[error("Inference failed: {0}")]
    InferenceFailed(String),
    #[error("Invalid input shape: expected {expected}, got {actual}")]
    InvalidInputShape { expected: String, actual: String },
    #[error("Invalid model output: {0}")]
    InvalidOutput(String),
    #[error(transparent)]
    Features(#[from] FeatureError),
}
