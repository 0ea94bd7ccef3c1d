//! Battery Health Route

use axum::{body::Bytes, extract::State, Json};
use data_validator::RequestFields;
use feature_engine::HealthFeatureEncoder;
use insights::{calculate_risk_level, insight, recommendation, HealthContext, RiskLevel};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

use super::{observe_inference, track};
use crate::error::ApiError;
use crate::AppState;

/// Response for `POST /predict_health`
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub prediction: String,
    pub prediction_index: usize,
    pub recommendation: &'static str,
    pub insight: String,
    pub risk_level: RiskLevel,
}

/// Classify battery health from the ten measurements
pub async fn predict_health(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<HealthResponse>, ApiError> {
    track("predict_health", handle(&state, &body)).map(Json)
}

fn handle(state: &AppState, body: &[u8]) -> Result<HealthResponse, ApiError> {
    let predictor = state
        .health
        .as_ref()
        .ok_or(ApiError::ModelUnavailable("Model not loaded"))?;

    let fields = RequestFields::from_slice(body)?;
    let features = HealthFeatureEncoder::new().encode(&fields)?;

    let start = Instant::now();
    let prediction = predictor.predict(&features)?;
    observe_inference("health", start);

    let ctx = HealthContext {
        charge_cycles: features.charge_cycles(),
        max_temperature: features.max_temperature(),
        capacity_retention: features.capacity_retention(),
    };

    Ok(HealthResponse {
        status: "success",
        recommendation: recommendation(&prediction.label),
        insight: insight(&prediction.label, &ctx),
        risk_level: calculate_risk_level(
            ctx.capacity_retention,
            ctx.charge_cycles,
            ctx.max_temperature,
        ),
        prediction_index: prediction.index,
        prediction: prediction.label,
    })
}
