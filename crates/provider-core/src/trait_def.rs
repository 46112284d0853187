//! The Provider trait definition.

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::request::{Completion, CompletionRequest};

/// The interface every LLM backend implements.
///
/// Implementations issue exactly one HTTP request per [`complete`] call,
/// enforce `request.timeout` as a hard deadline, and map backend-specific
/// failures into [`ProviderError`]. They must not retry internally and must
/// not touch circuit-breaker state; both are caller responsibilities.
///
/// [`complete`]: Provider::complete
#[async_trait]
pub trait Provider: Send + Sync {
    /// Issue one generation call.
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, ProviderError>;

    /// Provider name, used for circuit-breaker keys and error details.
    fn name(&self) -> &str;

    /// Model used for normal-speed generation.
    fn default_model(&self) -> &str;

    /// Model used for fast-speed generation.
    fn fast_model(&self) -> &str;
}
