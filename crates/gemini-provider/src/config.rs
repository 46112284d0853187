//! Configuration for GeminiProvider.

use provider_core::ProviderError;
use std::env;

/// Configuration for GeminiProvider.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API base URL.
    pub api_url: String,

    /// API key, sent as a query parameter.
    pub api_key: String,

    /// Model for normal-speed generation.
    pub default_model: String,

    /// Model for fast-speed generation.
    pub fast_model: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_url: "https://generativelanguage.googleapis.com".to_string(),
            api_key: String::new(),
            default_model: "gemini-2.0-flash".to_string(),
            fast_model: "gemini-2.0-flash".to_string(),
        }
    }
}

impl GeminiConfig {
    /// Create configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `GEMINI_API_KEY` - API key for authentication
    ///
    /// Optional environment variables:
    /// - `GEMINI_API_URL` - API base URL (default: https://generativelanguage.googleapis.com)
    /// - `GEMINI_MODEL` - Model name (default: gemini-2.0-flash)
    /// - `GEMINI_FAST_MODEL` - Fast model name (default: same as GEMINI_MODEL)
    pub fn from_env() -> Result<Self, ProviderError> {
        let api_key = env::var("GEMINI_API_KEY")
            .map_err(|_| ProviderError::Configuration("GEMINI_API_KEY not set".to_string()))?;

        let api_url = env::var("GEMINI_API_URL")
            .unwrap_or_else(|_| "https://generativelanguage.googleapis.com".to_string());

        let default_model =
            env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-2.0-flash".to_string());

        let fast_model =
            env::var("GEMINI_FAST_MODEL").unwrap_or_else(|_| default_model.clone());

        Ok(Self {
            api_url,
            api_key,
            default_model,
            fast_model,
        })
    }

    /// Create a new config builder.
    pub fn builder() -> GeminiConfigBuilder {
        GeminiConfigBuilder::default()
    }
}

/// Builder for GeminiConfig.
#[derive(Debug, Default)]
pub struct GeminiConfigBuilder {
    config: GeminiConfig,
}

impl GeminiConfigBuilder {
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
    pub fn build(self) -> GeminiConfig {
        self.config
    }
}
