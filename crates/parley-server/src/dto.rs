//! Data transfer objects for HTTP serialization.

use serde::{Deserialize, Serialize};

/// Query string of `GET /chat`.
#[derive(Debug, Deserialize)]
pub struct ChatQuery {
    #[serde(default)]
    pub message: Option<String>,
}

/// Successful relay result.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub message: String,
    pub response: String,
}

/// Payload of `GET /test`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: String,
}
