//! Value-for-Money Route

use axum::{body::Bytes, extract::State, Json};
use data_validator::RequestFields;
use feature_engine::{FeatureError, ValueInput};
use insights::{analyze, ValueTier};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

use super::{observe_inference, track};
use crate::error::ApiError;
use crate::AppState;

/// Response for `POST /predict_value`
#[derive(Debug, Serialize)]
pub struct ValueResponse {
    pub status: &'static str,
    pub value_score: f64,
    pub recommendation: ValueTier,
    pub insights: Vec<String>,
    pub fair_price_range: Option<String>,
}

/// Score a listing and explain its price tier
pub async fn predict_value(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<ValueResponse>, ApiError> {
    track("predict_value", handle(&state, &body)).map(Json)
}

fn handle(state: &AppState, body: &[u8]) -> Result<ValueResponse, ApiError> {
    let predictor = state
        .value
        .as_ref()
        .ok_or(ApiError::ModelUnavailable("Value Model not loaded"))?;

    // Every failure on this route is a server error, malformed bodies included
    let fields = RequestFields::from_slice(body).map_err(FeatureError::from)?;
    let input = ValueInput::from_fields(&fields)?;

    let start = Instant::now();
    let score = predictor.predict(&input)?;
    observe_inference("value", start);

    let mut selector = state.selection.selector();
    let assessment = analyze(score, &input, selector.as_mut());

    Ok(ValueResponse {
        status: "success",
        value_score: assessment.score,
        recommendation: assessment.recommendation,
        insights: assessment.insights,
        fair_price_range: assessment.fair_price_range,
    })
}
