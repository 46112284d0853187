//! AnthropicProvider implementation using the Messages API.

use provider_core::{
    async_trait, Completion, CompletionRequest, Provider, ProviderError, TokenUsage,
};
use reqwest::Client;
use tracing::{debug, warn};

use crate::api_types::{ApiErrorBody, Message, MessagesRequest, MessagesResponse};
use crate::config::AnthropicConfig;

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// A provider implementation backed by the Anthropic Messages API.
pub struct AnthropicProvider {
    client: Client,
    config: AnthropicConfig,
}

impl AnthropicProvider {
    /// Create a new AnthropicProvider with the given configuration.
    pub fn new(config: AnthropicConfig) -> Result<Self, ProviderError> {
        if config.api_key.is_empty() {
            return Err(ProviderError::Configuration(
                "Anthropic API key is empty".to_string(),
            ));
        }

        let client = Client::builder().build().map_err(|e| {
            ProviderError::Configuration(format!("Failed to create HTTP client: {}", e))
        })?;

        Ok(Self { client, config })
    }

    /// Create an AnthropicProvider from environment variables.
    ///
    /// See [`AnthropicConfig::from_env`] for the variables read.
    pub fn from_env() -> Result<Self, ProviderError> {
        let config = AnthropicConfig::from_env()?;
        Self::new(config)
    }

    /// Get the configuration.
    pub fn config(&self) -> &AnthropicConfig {
        &self.config
    }
}

#[async_trait]
impl Provider for AnthropicProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, ProviderError> {
        let url = format!("{}/v1/messages", self.config.api_url);

        let body = MessagesRequest {
            model: request.model.clone(),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            top_p: request.top_p,
            system: request.system_prompt,
            messages: vec![Message::user(request.user_prompt)],
        };

        debug!(model = %request.model, "Sending request to Anthropic API");

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("Content-Type", "application/json")
            .json(&body)
            .timeout(request.timeout)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Anthropic API call failed");
            return Err(map_status_error(status.as_u16(), &error_text));
        }

        let parsed: MessagesResponse = response.json().await.map_err(|e| {
            ProviderError::InvalidResponse(format!("Failed to parse response: {}", e))
        })?;

        let text = parsed
            .content
            .iter()
            .filter(|block| block.block_type == "text")
            .map(|block| block.text.as_str())
            .collect::<Vec<_>>()
            .join("");

        let usage = TokenUsage::from_counts(parsed.usage.input_tokens, parsed.usage.output_tokens);

        debug!(
            input_tokens = usage.input_tokens,
            output_tokens = usage.output_tokens,
            "Received response from Anthropic API"
        );

        Ok(Completion { text, usage })
    }

    fn name(&self) -> &str {
        "anthropic"
    }

    fn default_model(&self) -> &str {
        &self.config.default_model
    }

    fn fast_model(&self) -> &str {
        &self.config.fast_model
    }
}

/// Map a reqwest transport failure into the uniform taxonomy.
fn map_transport_error(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout(err.to_string())
    } else {
        ProviderError::Network(err.to_string())
    }
}

/// Map a non-2xx status and body into the uniform taxonomy.
fn map_status_error(status: u16, body: &str) -> ProviderError {
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .map(|parsed| parsed.error.message)
        .unwrap_or_else(|_| body.to_string());

    match status {
        401 | 403 => ProviderError::Auth(format!(
            "Anthropic rejected the API key: {}. Rotate the key and retry.",
            message
        )),
        429 => ProviderError::RateLimited(message),
        400..=499 => {
            if message.to_lowercase().contains("credit balance is too low") {
                ProviderError::Billing(
                    "Anthropic billing issue: insufficient API credits. \
                     Top up the Anthropic account and try again."
                        .to_string(),
                )
            } else {
                ProviderError::ApiRequest { status, message }
            }
        }
        _ => ProviderError::Server { status, message },
    }
}
