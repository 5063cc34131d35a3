//! Application error types and Axum response conversion.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use parley_core::RelayError;
use serde::Serialize;
use tracing::{error, warn};

/// Application-level errors with HTTP status code mapping.
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    BadGateway(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl From<RelayError> for AppError {
    fn from(err: RelayError) -> Self {
        match err {
            RelayError::Validation(msg) => AppError::BadRequest(msg),
            RelayError::Upstream(msg) => AppError::BadGateway(format!("model request failed: {}", msg)),
            RelayError::Auth(msg) => {
                AppError::BadGateway(format!("model API rejected the configured credential: {}", msg))
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => {
                warn!("Rejected request: {}", msg);
                (StatusCode::BAD_REQUEST, msg)
            }
            AppError::BadGateway(msg) => {
                error!("Upstream failure: {}", msg);
                (StatusCode::BAD_GATEWAY, msg)
            }
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
