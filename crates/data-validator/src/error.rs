//! Validation Error Types

use thiserror::Error;

/// Errors raised while reading fields out of a request payload
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Required field absent or null
    #[error("Missing feature: {0}")]
    MissingField(&'static str),

    /// Field present but not convertible to a number
    #[error("Invalid numeric value for {field}: {value}")]
    InvalidNumber { field: &'static str, value: String },

    /// Payload is not a JSON object
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),
}

impl ValidationError {
    /// Name of the offending field, if the error concerns a single field
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ValidationError::MissingField(field) => Some(field),
            ValidationError::InvalidNumber { field, .. } => Some(field),
            ValidationError::InvalidFormat(_) => None,
        }
    }
}
