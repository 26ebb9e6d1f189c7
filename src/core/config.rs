use std::env;
use std::time::Duration;

use async_openai::config::OpenAIConfig;

use crate::core::api_key;

/// Environment variable holding the model credential.
pub const API_KEY_VAR: &str = "GOOGLE_API_KEY";

/// Gemini's OpenAI-compatible endpoint (no trailing slash; the client appends paths).
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Where the API key was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    Env,
    Stored,
}

impl std::fmt::Display for KeySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeySource::Env => write!(f, "from {}", API_KEY_VAR),
            KeySource::Stored => write!(f, "from stored api-key file"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub openai_config: OpenAIConfig,
    pub model_id: String,
    pub base_url: String,
    pub timeout: Duration,
    pub key_source: KeySource,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(
        "{} is not set (export it, add it to .env, or run `equation-enhancer config set-api-key`)",
        API_KEY_VAR
    )]
    MissingApiKey,
    #[error("ENHANCER_TIMEOUT_SECS must be a positive number of seconds, got {0:?}")]
    InvalidTimeout(String),
}

/// Endpoint settings that do not need a key (shown by `config`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub base_url: String,
    pub model_id: String,
}

/// Load configuration from the environment and the stored key file.
/// Returns an error if no API key is available.
pub fn load() -> Result<Config, ConfigError> {
    load_from(|name| env::var(name).ok(), api_key::load_api_key)
}

/// Resolve base URL and model from the environment, falling back to defaults.
pub fn endpoint() -> Endpoint {
    endpoint_from(&|name: &str| env::var(name).ok())
}

fn endpoint_from(lookup: &dyn Fn(&str) -> Option<String>) -> Endpoint {
    let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
    Endpoint {
        base_url: non_empty("GEMINI_BASE_URL")
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        model_id: non_empty("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
    }
}

fn load_from<F, S>(lookup: F, stored_key: S) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    S: FnOnce() -> Option<String>,
{
    let (api_key, key_source) = match lookup(API_KEY_VAR).filter(|k| !k.trim().is_empty()) {
        Some(key) => (key.trim().to_string(), KeySource::Env),
        None => (stored_key().ok_or(ConfigError::MissingApiKey)?, KeySource::Stored),
    };

    let timeout = match lookup("ENHANCER_TIMEOUT_SECS") {
        Some(raw) => match raw.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => Duration::from_secs(secs),
            _ => return Err(ConfigError::InvalidTimeout(raw)),
        },
        None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
    };

    let Endpoint { base_url, model_id } = endpoint_from(&lookup);

    let openai_config = OpenAIConfig::new()
        .with_api_base(base_url.clone())
        .with_api_key(api_key);

    Ok(Config {
        openai_config,
        model_id,
        base_url,
        timeout,
        key_source,
    })
}
