//! HTTP Error Mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use data_validator::ValidationError;
use feature_engine::FeatureError;
use inference_engine::InferenceError;
use sales_forecast::ForecastError;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

/// Any failure a route can answer with
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed request field
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Model loaded without the metadata preprocessing needs
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Preprocessing error: {0}")]
    Preprocessing(String),
    /// Artifact failed to load at startup
    #[error("{0}")]
    ModelUnavailable(&'static str),
    #[error(transparent)]
    Inference(InferenceError),
    #[error(transparent)]
    Forecast(#[from] ForecastError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<FeatureError> for ApiError {
    fn from(err: FeatureError) -> Self {
        match err {
            FeatureError::Configuration(msg) => Self::Configuration(msg),
            FeatureError::Preprocessing(msg) => Self::Preprocessing(msg),
        }
    }
}

impl From<InferenceError> for ApiError {
    fn from(err: InferenceError) -> Self {
        match err {
            InferenceError::Features(inner) => inner.into(),
            other => Self::Inference(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %message, "Request failed");
        } else {
            warn!(status = status.as_u16(), error = %message, "Request rejected");
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}
