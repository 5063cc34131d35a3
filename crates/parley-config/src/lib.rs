//! Process configuration and persona loading.
//!
//! This crate builds the immutable settings the binaries construct once at
//! startup:
//!
//! - [`Settings`] — Credential, endpoint, model, bind address and persona
//! - [`ConfigError`] — Fatal configuration errors
//! - [`default_persona`] — The built-in persona
//!
//! # Loading
//!
//! ```rust,ignore
//! use parley_config::Settings;
//!
//! // Reads `.env` (if present) then the process environment.
//! let settings = Settings::from_env()?;
//! ```
//!
//! # Environment
//!
//! | Variable | Default |
//! |----------|---------|
//! | `GEMINI_API_KEY` | required |
//! | `PARLEY_API_BASE` | Gemini OpenAI-compatible endpoint |
//! | `PARLEY_MODEL` | `gemini-2.0-flash` |
//! | `PARLEY_BIND_ADDR` | `0.0.0.0:8000` |
//! | `PARLEY_PERSONA_FILE` | built-in persona |
//! | `PARLEY_VERIFY_CREDENTIAL` | `false` |

use std::fmt;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;

use parley_core::Persona;
use tracing::info;

pub const API_KEY_VAR: &str = "GEMINI_API_KEY";
pub const API_BASE_VAR: &str = "PARLEY_API_BASE";
pub const MODEL_VAR: &str = "PARLEY_MODEL";
pub const BIND_ADDR_VAR: &str = "PARLEY_BIND_ADDR";
pub const PERSONA_FILE_VAR: &str = "PARLEY_PERSONA_FILE";
pub const VERIFY_CREDENTIAL_VAR: &str = "PARLEY_VERIFY_CREDENTIAL";

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/openai/";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";

const DEFAULT_PERSONA_NAME: &str = "AboutMeAgent";
const DEFAULT_PERSONA_INSTRUCTIONS: &str = "You are a helpful assistant that only answers questions \
about Abid Ali. Abid Ali is an AI agents developer from Pakistan. \
He loves Python, FastAPI, Postgres, and RAG systems. \
He is currently learning AWS deployment.";

/// Errors that can occur while loading configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The model API credential is absent or blank.
    #[error("{0} not set in environment (.env)")]
    MissingCredential(&'static str),

    /// An environment variable holds an unusable value.
    #[error("Invalid value for {var}: '{value}'")]
    Invalid { var: &'static str, value: String },

    /// Failed to read a persona file.
    #[error("Failed to read persona file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse persona JSON.
    #[error("Failed to parse persona: {0}")]
    Parse(#[from] serde_json::Error),

    /// Persona is well-formed but unusable.
    #[error("Invalid persona '{name}': {message}")]
    Validation { name: String, message: String },
}

impl ConfigError {
    fn validation(name: &str, message: impl Into<String>) -> Self {
        Self::Validation {
            name: name.to_string(),
            message: message.into(),
        }
    }
}

/// Returns the persona used when no persona file is configured.
pub fn default_persona() -> Persona {
    Persona::new(DEFAULT_PERSONA_NAME, DEFAULT_PERSONA_INSTRUCTIONS)
}

/// Parses and validates a persona from JSON.
pub fn persona_from_json(json: &str) -> Result<Persona, ConfigError> {
    let persona: Persona = serde_json::from_str(json)?;
    validate_persona(&persona)?;
    Ok(persona)
}

/// Loads and validates a persona from a JSON file.
pub fn persona_from_file(path: impl AsRef<Path>) -> Result<Persona, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    persona_from_json(&content)
}

fn validate_persona(persona: &Persona) -> Result<(), ConfigError> {
    if persona.name.trim().is_empty() {
        return Err(ConfigError::validation(&persona.name, "name is empty"));
    }
    if persona.instructions.trim().is_empty() {
        return Err(ConfigError::validation(&persona.name, "instructions are empty"));
    }
    if !persona.tools.is_empty() {
        return Err(ConfigError::validation(
            &persona.name,
            format!("declares {} tools; tool calling is not supported", persona.tools.len()),
        ));
    }
    Ok(())
}

/// Immutable process settings, constructed once at startup.
#[derive(Clone)]
pub struct Settings {
    pub api_key: String,
    pub api_base: String,
    pub model: String,
    pub bind_addr: SocketAddr,
    pub verify_credential: bool,
    pub persona: Persona,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("bind_addr", &self.bind_addr)
            .field("verify_credential", &self.verify_credential)
            .field("persona", &self.persona.name)
            .finish()
    }
}

impl Settings {
    /// Loads `.env` if present, then reads settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = get(API_KEY_VAR).ok_or(ConfigError::MissingCredential(API_KEY_VAR))?;

        let bind_raw = get(BIND_ADDR_VAR).unwrap_or_else(|| DEFAULT_BIND_ADDR.into());
        let bind_addr = bind_raw.parse().map_err(|_| ConfigError::Invalid {
            var: BIND_ADDR_VAR,
            value: bind_raw.clone(),
        })?;

        let verify_credential = match get(VERIFY_CREDENTIAL_VAR) {
            None => false,
            Some(v) => parse_flag(&v).ok_or(ConfigError::Invalid {
                var: VERIFY_CREDENTIAL_VAR,
                value: v,
            })?,
        };

        let persona = match get(PERSONA_FILE_VAR) {
            Some(path) => {
                let persona = persona_from_file(&path)?;
                info!("Loaded persona '{}' from {}", persona.name, path);
                persona
            }
            None => default_persona(),
        };

        Ok(Self {
            api_key,
            api_base: get(API_BASE_VAR).unwrap_or_else(|| DEFAULT_API_BASE.into()),
            model: get(MODEL_VAR).unwrap_or_else(|| DEFAULT_MODEL.into()),
            bind_addr,
            verify_credential,
            persona,
        })
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
