//! Core domain types and error definitions for parley.
//!
//! This crate provides the types shared across the parley relay:
//!
//! - [`RelayError`] — Error taxonomy for relay and model client operations
//! - [`Persona`] — Fixed system instructions bound once at startup
//! - [`Reply`] and [`LlmMetrics`] — The model's answer to one query
//! - [`ToolSchema`] — Capability description (personas currently declare none)
//!
//! # Example
//!
//! ```rust
//! use parley_core::Persona;
//!
//! let persona = Persona::new("Helper", "You are a helpful assistant.");
//! assert!(persona.tools.is_empty());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while relaying a query to the upstream model.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RelayError {
    /// Network failure, timeout, or non-success response from the model API.
    #[error("Upstream request failed: {0}")]
    Upstream(String),

    /// The model API rejected the configured credential.
    #[error("Upstream rejected credentials: {0}")]
    Auth(String),

    /// The caller supplied an unusable query.
    #[error("Invalid query: {0}")]
    Validation(String),
}

/// Fixed system persona sent with every query.
///
/// Built once at process start and shared read-only by every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Persona {
    /// Display name used in banners and health output.
    pub name: String,
    /// System prompt constraining the model's behavior.
    pub instructions: String,
    /// Capabilities exposed to the model. Always empty: the relay does no tool calling.
    #[serde(default)]
    pub tools: Vec<ToolSchema>,
}

impl Persona {
    /// Creates a persona with no capabilities.
    pub fn new(name: impl Into<String>, instructions: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            instructions: instructions.into(),
            tools: Vec::new(),
        }
    }
}

/// Token usage and timing metrics from a model call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LlmMetrics {
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub elapsed_ms: u64,
}

/// The model's answer to exactly one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Text returned by the model, unmodified.
    pub content: String,
    pub metrics: LlmMetrics,
}

impl Reply {
    /// Creates a reply with zeroed metrics.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            metrics: LlmMetrics::default(),
        }
    }
}

/// JSON schema describing a tool for LLM function calling.
///
/// Follows the OpenAI function calling format. Personas loaded from
/// configuration are rejected when they declare any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSchema {
    /// Unique name of the tool.
    pub name: String,
    /// Human-readable description of what the tool does.
    pub description: String,
    /// JSON Schema object describing the tool's parameters.
    pub parameters: serde_json::Value,
}
