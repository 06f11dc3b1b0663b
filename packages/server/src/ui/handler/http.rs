//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State};
use serde::Serialize;

use crate::ui::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthDto {
    pub status: &'static str,
    pub connections: usize,
}

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthDto> {
    Json(HealthDto {
        status: "ok",
        connections: state.registry.count_connections().await,
    })
}
