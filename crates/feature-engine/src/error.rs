//! Feature Construction Errors

use data_validator::ValidationError;
use thiserror::Error;

/// Errors while building model input rows
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureError {
    /// Model loaded without the metadata needed to build its inputs
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Request values could not be turned into features
    #[error("Preprocessing error: {0}")]
    Preprocessing(String),
}

impl From<ValidationError> for FeatureError {
    fn from(err: ValidationError) -> Self {
        FeatureError::Preprocessing(err.to_string())
    }
}
