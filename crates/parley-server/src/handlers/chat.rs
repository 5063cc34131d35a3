//! Single-turn chat relay handler.

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};

use crate::dto::{ChatQuery, ChatResponse};
use crate::error::AppError;
use crate::AppState;

/// Relays `?message=` to the model and returns the exchange.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ChatQuery>, QueryRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let Query(query) = query.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    let message = query
        .message
        .ok_or_else(|| AppError::BadRequest("missing required query parameter 'message'".into()))?;

    let reply = state.relay.run(&message).await?;

    Ok(Json(ChatResponse {
        message,
        response: reply.content,
    }))
}
