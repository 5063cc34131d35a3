//! HTTP route handlers for the relay server.

pub mod chat;

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::dto::HealthResponse;
use crate::AppState;

/// Health check endpoint.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "working",
        message: format!("{} is running!", state.relay.persona().name),
    })
}
