//! Single-turn relay runner.
//!
//! [`Relay`] pairs the fixed [`Persona`] with a [`ModelClient`] and forwards
//! one query per call. It keeps no history: every call is independent and
//! the reply is returned exactly as the model produced it.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use parley_engine::Relay;
//!
//! let relay = Relay::new(Arc::new(client), Arc::new(persona));
//! let reply = relay.run("Who is Abid Ali?").await?;
//! ```

use std::sync::Arc;
use std::time::Instant;

use parley_core::{Persona, RelayError, Reply};
use parley_llm::ModelClient;
use tracing::{error, info};

const PREVIEW_CHARS: usize = 50;

/// Forwards queries to a model client under a fixed persona.
#[derive(Clone)]
pub struct Relay {
    client: Arc<dyn ModelClient>,
    persona: Arc<Persona>,
}

impl Relay {
    pub fn new(client: Arc<dyn ModelClient>, persona: Arc<Persona>) -> Self {
        Self { client, persona }
    }

    /// The persona every query is sent with.
    pub fn persona(&self) -> &Persona {
        &self.persona
    }

    /// Model identifier of the underlying client.
    pub fn model(&self) -> &str {
        self.client.model()
    }

    /// Relays `query` to the model and returns its reply unmodified.
    ///
    /// Blank queries are rejected with [`RelayError::Validation`] before any
    /// upstream call is made.
    pub async fn run(&self, query: &str) -> Result<Reply, RelayError> {
        if query.trim().is_empty() {
            return Err(RelayError::Validation("message must not be empty".into()));
        }

        info!(
            "Relay ({} via {}): {}",
            self.persona.name,
            self.client.model(),
            preview(query)
        );

        let start = Instant::now();
        match self.client.generate(&self.persona, query).await {
            Ok(reply) => {
                info!(
                    "Relay complete: {}ms, tokens: {}/{}",
                    start.elapsed().as_millis(),
                    reply.metrics.input_tokens,
                    reply.metrics.output_tokens
                );
                Ok(reply)
            }
            Err(e) => {
                error!("Relay failed after {}ms: {}", start.elapsed().as_millis(), e);
                Err(e)
            }
        }
    }
}

/// First few characters of a query, for log lines.
fn preview(query: &str) -> String {
    match query.char_indices().nth(PREVIEW_CHARS) {
        Some((idx, _)) => format!("{}...", &query[..idx]),
        None => query.to_string(),
    }
}
