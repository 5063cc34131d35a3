//! Model client adapter for hosted chat-completion APIs.
//!
//! - [`ModelClient`] — The narrow interface the relay depends on
//! - [`OpenAiCompatClient`] — Implementation for any OpenAI-compatible
//!   endpoint (OpenAI, Gemini's `/v1beta/openai/`, Ollama's `/v1`)
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use parley_core::Persona;
//! use parley_llm::{ModelClient, OpenAiCompatClient};
//!
//! let client = OpenAiCompatClient::new(
//!     &api_key,
//!     "https://generativelanguage.googleapis.com/v1beta/openai/",
//!     "gemini-2.0-flash",
//! );
//! let persona = Persona::new("Helper", "You are helpful.");
//! let reply = client.generate(&persona, "Hello!").await?;
//! println!("{}", reply.content);
//! ```

mod client;

pub use client::OpenAiCompatClient;
pub use parley_core::{LlmMetrics, Persona, RelayError, Reply};

use async_trait::async_trait;

/// Generates text from a persona and a single user query.
///
/// Implementations make exactly one upstream attempt per call.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Returns the model identifier requests are sent to.
    fn model(&self) -> &str;

    /// Sends `query` under `persona` and returns the model's reply.
    async fn generate(&self, persona: &Persona, query: &str) -> Result<Reply, RelayError>;

    /// Checks that the upstream accepts the configured credential.
    async fn verify(&self) -> Result<(), RelayError> {
        Ok(())
    }
}
