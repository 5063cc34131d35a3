//! OpenAI-compatible chat client.
//!
//! Works with the OpenAI API and any compatible endpoint. Request and
//! response bodies use the async-openai types; the HTTP exchange is done
//! with reqwest directly so the status code survives non-OpenAI error bodies
//! (Gemini wraps its errors in an array). One attempt per call, no retries.

use std::time::Instant;

use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    CreateChatCompletionResponse,
};
use async_trait::async_trait;
use parley_core::{LlmMetrics, Persona, RelayError, Reply};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, info};

use crate::ModelClient;

// Gemini answers a bad key with 400 INVALID_ARGUMENT rather than 401.
const AUTH_MARKERS: &[&str] = &["invalid_api_key", "api key not valid", "incorrect api key"];

/// Converts request-building errors into upstream failures.
fn build_err(e: impl ToString) -> RelayError {
    RelayError::Upstream(e.to_string())
}

/// Converts transport failures into upstream failures.
fn transport_err(e: reqwest::Error) -> RelayError {
    match e.is_timeout() {
        true => RelayError::Upstream(format!("request timed out: {}", e)),
        false => RelayError::Upstream(e.to_string()),
    }
}

/// Pulls `error.message` out of an OpenAI-style or Gemini-style error body.
fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let error = match &value {
        Value::Array(items) => items.first()?.get("error")?,
        other => other.get("error")?,
    };
    error.get("message")?.as_str().map(String::from)
}

/// Maps a non-success response onto the relay taxonomy.
fn status_error(status: StatusCode, body: &str) -> RelayError {
    let message = error_message(body).unwrap_or_else(|| body.trim().to_string());
    let detail = match message.is_empty() {
        true => status.to_string(),
        false => format!("{}: {}", status, message),
    };

    let lowered = message.to_ascii_lowercase();
    let rejected = matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
        || AUTH_MARKERS.iter().any(|m| lowered.contains(m));

    match rejected {
        true => RelayError::Auth(detail),
        false => RelayError::Upstream(detail),
    }
}

/// Builds the message list for a persona + user request.
fn build_messages(
    persona: &Persona,
    query: &str,
) -> Result<Vec<ChatCompletionRequestMessage>, RelayError> {
    Ok(vec![
        ChatCompletionRequestMessage::System(
            ChatCompletionRequestSystemMessageArgs::default()
                .content(persona.instructions.as_str())
                .build()
                .map_err(build_err)?,
        ),
        ChatCompletionRequestMessage::User(
            ChatCompletionRequestUserMessageArgs::default()
                .content(query)
                .build()
                .map_err(build_err)?,
        ),
    ])
}

/// Extracts content and metrics from a completion response.
fn extract_reply(response: CreateChatCompletionResponse, elapsed_ms: u64) -> Result<Reply, RelayError> {
    let (input_tokens, output_tokens) = response
        .usage
        .as_ref()
        .map(|u| (u.prompt_tokens, u.completion_tokens))
        .unwrap_or((0, 0));

    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| RelayError::Upstream("No response content".into()))?;

    info!(
        "LLM: {}ms, tokens: {}/{} (in/out)",
        elapsed_ms, input_tokens, output_tokens
    );

    Ok(Reply {
        content,
        metrics: LlmMetrics { input_tokens, output_tokens, elapsed_ms },
    })
}

/// Client for OpenAI-compatible chat completion APIs.
pub struct OpenAiCompatClient {
    client: Client,
    api_base: String,
    api_key: String,
    model: String,
}

impl OpenAiCompatClient {
    /// Creates a client for `model` at `api_base`, authenticating with `api_key`.
    pub fn new(api_key: &str, api_base: &str, model: &str) -> Self {
        Self {
            client: Client::new(),
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path)
    }
}

#[async_trait]
impl ModelClient for OpenAiCompatClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, persona: &Persona, query: &str) -> Result<Reply, RelayError> {
        let start = Instant::now();
        let messages = build_messages(persona, query)?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .build()
            .map_err(build_err)?;

        let response = self
            .client
            .post(self.url("chat/completions"))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(transport_err)?;

        let status = response.status();
        let body = response.text().await.map_err(transport_err)?;
        if !status.is_success() {
            return Err(status_error(status, &body));
        }

        let completion: CreateChatCompletionResponse = serde_json::from_str(&body)
            .map_err(|e| RelayError::Upstream(format!("malformed completion response: {}", e)))?;
        extract_reply(completion, start.elapsed().as_millis() as u64)
    }

    async fn verify(&self) -> Result<(), RelayError> {
        let response = self
            .client
            .get(self.url("models"))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(transport_err)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }

        debug!("Credential accepted by {}", self.api_base);
        Ok(())
    }
}
