//! GeminiProvider implementation using the generateContent API.

use provider_core::{
    async_trait, Completion, CompletionRequest, Provider, ProviderError, TokenUsage,
};
use reqwest::Client;
use tracing::{debug, warn};

use crate::api_types::{
    ApiErrorBody, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
};
use crate::config::GeminiConfig;

/// A provider implementation backed by the Gemini generateContent API.
pub struct GeminiProvider {
    client: Client,
    config: GeminiConfig,
}

impl GeminiProvider {
    /// Create a new GeminiProvider with the given configuration.
    pub fn new(config: GeminiConfig) -> Result<Self, ProviderError> {
        if config.api_key.is_empty() {
            return Err(ProviderError::Configuration(
                "Gemini API key is empty".to_string(),
            ));
        }

        let client = Client::builder().build().map_err(|e| {
            ProviderError::Configuration(format!("Failed to create HTTP client: {}", e))
        })?;

        Ok(Self { client, config })
    }

    /// Create a GeminiProvider from environment variables.
    ///
    /// See [`GeminiConfig::from_env`] for the variables read.
    pub fn from_env() -> Result<Self, ProviderError> {
        let config = GeminiConfig::from_env()?;
        Self::new(config)
    }

    /// Get the configuration.
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }
}

#[async_trait]
impl Provider for GeminiProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, ProviderError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.config.api_url, request.model, self.config.api_key
        );

        let body = GenerateContentRequest {
            contents: vec![Content::from_text(request.user_prompt)],
            system_instruction: Content::from_text(request.system_prompt),
            generation_config: GenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_tokens,
                top_p: request.top_p,
            },
        };

        debug!(model = %request.model, "Sending request to Gemini API");

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body)
            .timeout(request.timeout)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Gemini API call failed");
            return Err(map_status_error(status.as_u16(), &error_text));
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|e| {
            ProviderError::InvalidResponse(format!("Failed to parse response: {}", e))
        })?;

        let text = parsed
            .candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .map(|part| part.text.as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        let usage = parsed.usage_metadata.unwrap_or_default();
        let usage = TokenUsage {
            input_tokens: usage.prompt_token_count,
            output_tokens: usage.candidates_token_count,
            total_tokens: usage.total_token_count,
        };

        debug!(total_tokens = usage.total_tokens, "Received response from Gemini API");

        Ok(Completion { text, usage })
    }

    fn name(&self) -> &str {
        "gemini"
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
///
/// Gemini reports quota exhaustion through 429 with RESOURCE_EXHAUSTED
/// markers, which is a billing problem rather than transient rate
/// limiting, so those are mapped to the fatal billing kind.
fn map_status_error(status: u16, body: &str) -> ProviderError {
    let lower_body = body.to_lowercase();
    let parsed = serde_json::from_str::<ApiErrorBody>(body).ok();
    let message = parsed
        .as_ref()
        .map(|p| p.error.message.clone())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.to_string());
    let reason = parsed
        .as_ref()
        .and_then(|p| p.error.reason())
        .unwrap_or_default()
        .to_string();

    let quota_exhausted = lower_body.contains("resource_exhausted")
        || lower_body.contains("exceeded your current quota")
        || lower_body.contains("billing");

    if status == 429 {
        if quota_exhausted {
            return ProviderError::Billing(
                "Gemini quota/billing issue: the current key has exhausted its quota. \
                 Enable billing or use a key with available quota."
                    .to_string(),
            );
        }
        return ProviderError::RateLimited(message);
    }

    if (400..500).contains(&status) {
        if reason == "API_KEY_INVALID" || lower_body.contains("api key expired") {
            return ProviderError::Auth(
                "Gemini API key is invalid or expired. Create or rotate a valid key and retry."
                    .to_string(),
            );
        }
        if quota_exhausted || lower_body.contains("quota") {
            return ProviderError::Billing(
                "Gemini billing/quota issue: enable billing or increase quota.".to_string(),
            );
        }
        return ProviderError::ApiRequest { status, message };
    }

    ProviderError::Server { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> CompletionRequest {
        CompletionRequest {
            system_prompt: "You are an educator".to_string(),
            user_prompt: "Write about solar power".to_string(),
            model: "gemini-test".to_string(),
            temperature: 0.6,
            max_tokens: 650,
            top_p: Some(0.9),
            timeout: Duration::from_secs(5),
        }
    }

    fn provider(api_url: &str) -> GeminiProvider {
        let config = GeminiConfig::builder()
            .api_key("g-key")
            .api_url(api_url)
            .build();
        GeminiProvider::new(config).unwrap()
    }

    #[test]
    fn test_new_rejects_empty_key() {
        let result = GeminiProvider::new(GeminiConfig::default());
        assert!(matches!(result, Err(ProviderError::Configuration(_))));
    }

    #[test]
    fn test_map_status_quota_429_is_billing() {
        let err = map_status_error(
            429,
            r#"{"error":{"message":"You exceeded your current quota","details":[]}}"#,
        );
        assert!(matches!(err, ProviderError::Billing(_)));
        assert!(!err.is_retriable());
    }

    #[test]
    fn test_map_status_plain_429_is_retriable() {
        let err = map_status_error(429, r#"{"error":{"message":"try again soon","details":[]}}"#);
        assert!(matches!(err, ProviderError::RateLimited(_)));
    }

    #[test]
    fn test_map_status_invalid_key() {
        let err = map_status_error(
            400,
            r#"{"error":{"message":"API key expired","details":[{"reason":"API_KEY_INVALID"}]}}"#,
        );
        assert!(matches!(err, ProviderError::Auth(_)));
    }

    #[test]
    fn test_map_status_bad_request_and_server() {
        let err = map_status_error(400, r#"{"error":{"message":"unknown model","details":[]}}"#);
        assert!(matches!(err, ProviderError::ApiRequest { status: 400, .. }));
        assert!(map_status_error(503, "unavailable").is_retriable());
    }

    #[tokio::test]
    async fn test_complete_success() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-test:generateContent"))
            .and(query_param("key", "g-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{"content": {"parts": [{"text": "# Solar\n\nBody text."}]}}],
                "usageMetadata": {"promptTokenCount": 15, "candidatesTokenCount": 80, "totalTokenCount": 95}
            })))
            .mount(&server)
            .await;

        let provider = provider(&server.uri());
        let completion = provider.complete(request()).await.unwrap();

        assert_eq!(completion.text, "# Solar\n\nBody text.");
        assert_eq!(completion.usage.total_tokens, 95);
    }

    #[tokio::test]
    async fn test_complete_empty_candidates_yields_empty_text() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-test:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let provider = provider(&server.uri());
        let completion = provider.complete(request()).await.unwrap();

        assert!(completion.text.is_empty());
        assert_eq!(completion.usage, TokenUsage::default());
    }
}
