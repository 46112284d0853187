//! Scripted provider implementation - plays back a sequence of outcomes.

use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use provider_core::{Completion, CompletionRequest, Provider, ProviderError, TokenUsage};
use tokio::sync::Mutex;

/// A provider that returns pre-scripted outcomes in order.
///
/// Each call consumes the next entry. When the script runs out, the last
/// entry repeats. Useful for retry tests that need a failure followed by a
/// success.
pub struct ScriptedProvider {
    script: Mutex<Vec<Result<String, ProviderError>>>,
    calls: AtomicU32,
}

impl ScriptedProvider {
    /// Create a ScriptedProvider from a list of outcomes.
    pub fn new(script: Vec<Result<String, ProviderError>>) -> Self {
        Self {
            script: Mutex::new(script),
            calls: AtomicU32::new(0),
        }
    }

    /// Number of attempted calls so far.
    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    async fn complete(&self, _request: CompletionRequest) -> Result<Completion, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let mut script = self.script.lock().await;
        let outcome = if script.len() > 1 {
            script.remove(0)
        } else {
            script
                .first()
                .cloned()
                .unwrap_or_else(|| Err(ProviderError::InvalidResponse("script empty".into())))
        };

        outcome.map(|text| Completion {
            text,
            usage: TokenUsage::default(),
        })
    }

    fn name(&self) -> &str {
        "mock"
    }

    fn default_model(&self) -> &str {
        "mock-default"
    }

    fn fast_model(&self) -> &str {
        "mock-fast"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn request() -> CompletionRequest {
        CompletionRequest {
            system_prompt: "system".into(),
            user_prompt: "user".into(),
            model: "mock-fast".into(),
            temperature: 0.7,
            max_tokens: 650,
            top_p: None,
            timeout: Duration::from_secs(1),
        }
    }

    #[tokio::test]
    async fn test_plays_script_in_order() {
        let provider = ScriptedProvider::new(vec![
            Err(ProviderError::Server {
                status: 500,
                message: "boom".into(),
            }),
            Ok("recovered".to_string()),
        ]);

        assert!(provider.complete(request()).await.is_err());
        let completion = provider.complete(request()).await.unwrap();
        assert_eq!(completion.text, "recovered");
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn test_last_entry_repeats() {
        let provider = ScriptedProvider::new(vec![Ok("same".to_string())]);

        assert_eq!(provider.complete(request()).await.unwrap().text, "same");
        assert_eq!(provider.complete(request()).await.unwrap().text, "same");
    }
}
