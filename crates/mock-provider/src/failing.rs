//! Failing provider implementation - errors on every call.

use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use provider_core::{Completion, CompletionRequest, Provider, ProviderError};

/// A provider that returns the configured error on every call.
///
/// Useful for failure-path and retry tests.
#[derive(Debug)]
pub struct FailingProvider {
    error: ProviderError,
    calls: AtomicU32,
}

impl FailingProvider {
    /// Create a FailingProvider returning the given error.
    pub fn new(error: ProviderError) -> Self {
        Self {
            error,
            calls: AtomicU32::new(0),
        }
    }

    /// Number of attempted calls so far.
    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Provider for FailingProvider {
    async fn complete(&self, _request: CompletionRequest) -> Result<Completion, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(self.error.clone())
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

    #[tokio::test]
    async fn test_always_fails() {
        let provider = FailingProvider::new(ProviderError::Auth("bad key".into()));
        let request = CompletionRequest {
            system_prompt: "system".into(),
            user_prompt: "user".into(),
            model: "mock-fast".into(),
            temperature: 0.7,
            max_tokens: 650,
            top_p: None,
            timeout: Duration::from_secs(1),
        };

        let err = provider.complete(request).await.unwrap_err();
        assert!(matches!(err, ProviderError::Auth(_)));
        assert_eq!(provider.call_count(), 1);
    }
}
