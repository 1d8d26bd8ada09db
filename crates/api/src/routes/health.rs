use crate::AppState;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub oils: usize,
    pub effects: usize,
    pub associations: usize,
}

/// Health check endpoint
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let stats = state.catalog.stats();

    Json(HealthResponse {
        status: "ok".to_string(),
        oils: stats.oils,
        effects: stats.effects,
        associations: stats.associations,
    })
}
