//! Configuration management for taskhub.
//!
//! Configuration can be set via environment variables:
//! - `HOST` - Optional. Server host. Defaults to `127.0.0.1`.
//! - `PORT` - Optional. Server port. Defaults to `8000`.
//! - `ENVIRONMENT` - Optional. `development` or `production`. Defaults to `development`.
//! - `STATIC_DIR` - Optional. Directory holding the client shell. Defaults to `static`.
//! - `ALLOWED_ORIGINS` - Optional. Comma-separated CORS origins for production.
//! - `OPENAI_API_KEY` - Optional. Upstream API key; the chat endpoint is disabled without it.
//! - `OPENAI_MODEL` - Optional. Default chat model. Defaults to `gpt-4o-mini`.
//! - `MAX_TOKENS` - Optional. Upper bound on per-request completion tokens. Defaults to `2048`.
//! - `RATE_LIMIT_REQUESTS` - Optional. Chat requests allowed per window. Defaults to `100`.
//! - `RATE_LIMIT_PERIOD` - Optional. Rate limit window in seconds. Defaults to `60`.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Deployment environment, controls CORS strictness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    fn from_env() -> Self {
        match std::env::var("ENVIRONMENT").as_deref() {
            Ok(v) if v.eq_ignore_ascii_case("production") => Environment::Production,
            _ => Environment::Development,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Deployment environment
    pub environment: Environment,

    /// Directory holding the static client shell
    pub static_dir: PathBuf,

    /// CORS origins honored in production ("*" means none are configured)
    pub allowed_origins: Vec<String>,

    /// Upstream API key for the chat proxy (chat disabled when absent)
    pub openai_api_key: Option<String>,

    /// Default chat model
    pub default_model: String,

    /// Upper bound on per-request completion tokens
    pub max_tokens: u32,

    /// Chat requests allowed per rate-limit window
    pub rate_limit_requests: usize,

    /// Rate-limit window in seconds
    pub rate_limit_period: u64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse()
            .map_err(|e| ConfigError::InvalidValue("PORT".to_string(), format!("{}", e)))?;

        let static_dir = std::env::var("STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("static"));

        let allowed_origins = std::env::var("ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_tokens = std::env::var("MAX_TOKENS")
            .unwrap_or_else(|_| "2048".to_string())
            .parse()
            .map_err(|e| ConfigError::InvalidValue("MAX_TOKENS".to_string(), format!("{}", e)))?;

        let rate_limit_requests = std::env::var("RATE_LIMIT_REQUESTS")
            .unwrap_or_else(|_| "100".to_string())
            .parse()
            .map_err(|e| {
                ConfigError::InvalidValue("RATE_LIMIT_REQUESTS".to_string(), format!("{}", e))
            })?;

        let rate_limit_period = std::env::var("RATE_LIMIT_PERIOD")
            .unwrap_or_else(|_| "60".to_string())
            .parse()
            .map_err(|e| {
                ConfigError::InvalidValue("RATE_LIMIT_PERIOD".to_string(), format!("{}", e))
            })?;

        Ok(Self {
            host,
            port,
            environment: Environment::from_env(),
            static_dir,
            allowed_origins,
            openai_api_key: std::env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty()),
            default_model: std::env::var("OPENAI_MODEL")
                .unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            max_tokens,
            rate_limit_requests,
            rate_limit_period,
        })
    }

    /// Create a config with custom values (useful for testing).
    pub fn new(host: String, port: u16, static_dir: PathBuf) -> Self {
        Self {
            host,
            port,
            environment: Environment::Development,
            static_dir,
            allowed_origins: vec!["*".to_string()],
            openai_api_key: None,
            default_model: "gpt-4o-mini".to_string(),
            max_tokens: 2048,
            rate_limit_requests: 100,
            rate_limit_period: 60,
        }
    }
}
