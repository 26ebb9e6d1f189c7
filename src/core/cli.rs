//! CLI-only commands: config info and API key storage.
//!
//! These run without a model call and produce plain text output.

use std::io::{self, Read};

use crate::core::api_key;
use crate::core::app;
use crate::core::config::{self, ConfigError};
use crate::core::paths;

/// Run the `config` command: display paths, endpoint, model, and API key status.
pub fn run_config() {
    let config_dir = paths::config_dir()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "—".to_string());
    let cache_dir = paths::cache_dir()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "—".to_string());

    let (endpoint, model, api_key_status) = match config::load() {
        Ok(c) => (c.base_url, c.model_id, format!("set ✓ ({})", c.key_source)),
        Err(ConfigError::MissingApiKey) => {
            let e = config::endpoint();
            (e.base_url, e.model_id, "not set".to_string())
        }
        Err(e @ ConfigError::InvalidTimeout(_)) => {
            let ep = config::endpoint();
            (ep.base_url, ep.model_id, format!("error: {}", e))
        }
    };

    println!("{} {}", app::NAME, app::VERSION);
    println!("Config:    {}", config_dir);
    println!("Cache:     {}", cache_dir);
    println!("Endpoint:  {}", endpoint);
    println!("Model:     {}", model);
    println!("API key:   {}", api_key_status);
}

/// Run the `config set-api-key` command: store API key in config directory.
pub fn run_config_set_api_key(api_key: Option<String>) {
    let key = match api_key {
        Some(k) if !k.trim().is_empty() => k.trim().to_string(),
        _ => {
            let mut buf = String::new();
            if let Err(e) = io::stdin().read_to_string(&mut buf) {
                eprintln!("Error reading from stdin: {}", e);
                std::process::exit(1);
            }
            let trimmed = buf.trim().to_string();
            if trimmed.is_empty() {
                eprintln!("Error: no API key provided");
                std::process::exit(1);
            }
            trimmed
        }
    };

    match api_key::store_api_key(&key) {
        Ok(path) => println!("API key saved to {}", path.display()),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
