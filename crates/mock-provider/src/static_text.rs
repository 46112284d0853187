//! Static provider implementation - returns fixed text.

use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use provider_core::{Completion, CompletionRequest, Provider, ProviderError, TokenUsage};

/// A provider that returns the same completion on every call.
///
/// Useful for exercising the orchestration flow without any network I/O.
#[derive(Debug, Default)]
pub struct StaticProvider {
    text: String,
    usage: TokenUsage,
    calls: AtomicU32,
}

impl StaticProvider {
    /// Create a StaticProvider returning the given text with zero usage.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            usage: TokenUsage::default(),
            calls: AtomicU32::new(0),
        }
    }

    /// Create a StaticProvider with explicit token usage.
    pub fn with_usage(text: impl Into<String>, usage: TokenUsage) -> Self {
        Self {
            text: text.into(),
            usage,
            calls: AtomicU32::new(0),
        }
    }

    /// Number of completed calls so far.
    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Provider for StaticProvider {
    async fn complete(&self, _request: CompletionRequest) -> Result<Completion, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Completion {
            text: self.text.clone(),
            usage: self.usage,
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
