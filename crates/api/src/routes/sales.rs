//! Sales Forecast Route

use axum::{
    extract::{Query, State},
    Json,
};
use sales_forecast::{ForecastError, Granularity, SalesForecast, DEFAULT_STEPS};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use super::{observe_inference, track};
use crate::error::ApiError;
use crate::AppState;

/// Response for `GET /predict_sales`
#[derive(Debug, Serialize)]
pub struct SalesResponse {
    pub status: &'static str,
    pub forecast: SalesForecast,
}

/// Forecast EV sales; `steps` counts years when `granularity=yearly`
pub async fn predict_sales(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<SalesResponse>, ApiError> {
    track("predict_sales", handle(&state, &params)).map(Json)
}

fn handle(state: &AppState, params: &HashMap<String, String>) -> Result<SalesResponse, ApiError> {
    let forecaster = state
        .sales
        .as_ref()
        .ok_or(ApiError::ModelUnavailable("Sales Model not loaded"))?;

    let steps = match params.get("steps") {
        Some(raw) => parse_steps(raw)?,
        None => DEFAULT_STEPS,
    };
    let granularity = params
        .get("granularity")
        .map(|g| Granularity::from_query(g))
        .unwrap_or_default();

    let start = Instant::now();
    let forecast = forecaster.forecast(steps, granularity)?;
    observe_inference("sales", start);

    Ok(SalesResponse {
        status: "success",
        forecast,
    })
}

fn parse_steps(raw: &str) -> Result<usize, ForecastError> {
    let steps: i64 = raw
        .trim()
        .parse()
        .map_err(|_| ForecastError::InvalidHorizon(format!("steps must be an integer, got {:?}", raw)))?;
    usize::try_from(steps)
        .map_err(|_| ForecastError::InvalidHorizon(format!("steps must be positive, got {}", steps)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_steps() {
        assert_eq!(parse_steps("12").unwrap(), 12);
        assert_eq!(parse_steps(" 5 ").unwrap(), 5);
        assert!(parse_steps("abc").is_err());
        assert!(parse_steps("1.5").is_err());
        assert!(parse_steps("-3").is_err());
    }
}
