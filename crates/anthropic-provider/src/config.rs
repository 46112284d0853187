//! Configuration for AnthropicProvider.

use provider_core::ProviderError;
use std::env;

/// Configuration for AnthropicProvider.
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    /// API base URL.
    pub api_url: String,

    /// API key for authentication.
    pub api_key: String,

    /// Model for normal-speed generation.
    pub default_model: String,

    /// Model for fast-speed generation.
    pub fast_model: String,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.anthropic.com".to_string(),
            api_key: String::new(),
            default_model: "claude-3-5-sonnet-20241022".to_string(),
            fast_model: "claude-3-5-haiku-20241022".to_string(),
        }
    }
}

impl AnthropicConfig {
    /// Create configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `ANTHROPIC_API_KEY` - API key for authentication
    ///
    /// Optional environment variables:
    /// - `ANTHROPIC_API_URL` - API base URL (default: https://api.anthropic.com)
    /// - `ANTHROPIC_MODEL` - Model name (default: claude-3-5-sonnet-20241022)
    /// - `ANTHROPIC_FAST_MODEL` - Fast model name (default: claude-3-5-haiku-20241022)
    pub fn from_env() -> Result<Self, ProviderError> {
        let api_key = env::var("ANTHROPIC_API_KEY")
            .map_err(|_| ProviderError::Configuration("ANTHROPIC_API_KEY not set".to_string()))?;

        let api_url = env::var("ANTHROPIC_API_URL")
            .unwrap_or_else(|_| "https://api.anthropic.com".to_string());

        let default_model = env::var("ANTHROPIC_MODEL")
            .unwrap_or_else(|_| "claude-3-5-sonnet-20241022".to_string());

        let fast_model = env::var("ANTHROPIC_FAST_MODEL")
            .unwrap_or_else(|_| "claude-3-5-haiku-20241022".to_string());

        Ok(Self {
            api_url,
            api_key,
            default_model,
            fast_model,
        })
    }

    /// Create a new config builder.
    pub fn builder() -> AnthropicConfigBuilder {
        AnthropicConfigBuilder::default()
    }
}

/// Builder for AnthropicConfig.
#[derive(Debug, Default)]
pub struct AnthropicConfigBuilder {
    config: AnthropicConfig,
}

impl AnthropicConfigBuilder {
    /// Set the API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    /// Set the API base URL.
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_url = url.into();
        self
    }

    /// Set the default model.
    pub fn default_model(mut self, model: impl Into<String>) -> Self {
        self.config.default_model = model.into();
        self
    }

    /// Set the fast model.
    pub fn fast_model(mut self, model: impl Into<String>) -> Self {
        self.config.fast_model = model.into();
        self
    }

    /// Build the configuration.
    pub fn build(self) -> AnthropicConfig {
        self.config
    }
}
