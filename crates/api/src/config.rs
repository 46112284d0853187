//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;

/// Which LLM provider backs generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Anthropic,
    Gemini,
}

/// API server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// SQLite database URL.
    pub database_url: String,
    /// Configured LLM provider.
    pub provider: ProviderKind,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `BLOG_API_ADDR` | Server bind address | `127.0.0.1:8787` |
    /// | `DATABASE_URL` | SQLite database URL | `sqlite:blog.db?mode=rwc` |
    /// | `LLM_PROVIDER` | `anthropic` or `gemini` | `anthropic` |
    pub fn from_env() -> Result<Self, ConfigError> {
        let addr = env::var("BLOG_API_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8787".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidAddr)?;

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:blog.db?mode=rwc".to_string());

        let provider = match env::var("LLM_PROVIDER")
            .unwrap_or_else(|_| "anthropic".to_string())
            .as_str()
        {
            "anthropic" => ProviderKind::Anthropic,
            "gemini" => ProviderKind::Gemini,
            other => return Err(ConfigError::UnsupportedProvider(other.to_string())),
        };

        Ok(Self {
            addr,
            database_url,
            provider,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid BLOG_API_ADDR format")]
    InvalidAddr,

    #[error("Unsupported LLM_PROVIDER '{0}' (expected anthropic or gemini)")]
    UnsupportedProvider(String),
}
