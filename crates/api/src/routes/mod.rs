//! Route Handlers

pub mod health;
pub mod sales;
pub mod status;
pub mod value;

use crate::error::ApiError;

/// Count a request on `route`, and its failure if any
pub(crate) fn track<T>(route: &'static str, result: Result<T, ApiError>) -> Result<T, ApiError> {
    metrics::counter!("ev_insight_requests_total", "route" => route).increment(1);
    if result.is_err() {
        metrics::counter!("ev_insight_errors_total", "route" => route).increment(1);
    }
    result
}

/// Record inference latency for `model`
pub(crate) fn observe_inference(model: &'static str, start: std::time::Instant) {
    metrics::histogram!("ev_insight_inference_seconds", "model" => model)
        .record(start.elapsed().as_secs_f64());
}
