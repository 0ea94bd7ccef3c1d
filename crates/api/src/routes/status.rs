//! Liveness Route

use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub health_model_loaded: bool,
    pub value_model_loaded: bool,
}

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "online",
        health_model_loaded: state.health.is_some(),
        value_model_loaded: state.value.is_some(),
    })
}
