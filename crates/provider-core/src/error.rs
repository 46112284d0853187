//! Error taxonomy for provider operations.

use thiserror::Error;

/// Errors surfaced by provider clients.
///
/// Every provider maps its backend-specific failures into these kinds so
/// callers can apply a uniform retry policy: [`is_retriable`] failures may
/// be attempted again with backoff, everything else is fatal for the call.
///
/// [`is_retriable`]: ProviderError::is_retriable
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// Credentials were rejected by the provider. Fatal.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Quota or credit exhaustion reported by the provider. Fatal; the
    /// message tells the operator what to fix.
    #[error("billing issue: {0}")]
    Billing(String),

    /// Any other 4xx response (bad params, unknown model). Fatal.
    #[error("request rejected ({status}): {message}")]
    ApiRequest { status: u16, message: String },

    /// 429 rate limiting. Retriable.
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// 5xx server error. Retriable.
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// The request deadline elapsed. Retriable.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// Connection-level failure. Retriable.
    #[error("network error: {0}")]
    Network(String),

    /// The client could not be constructed or is missing settings.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The provider returned a 2xx body the client could not interpret.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    /// Whether a caller may retry the call after a backoff delay.
    pub fn is_retriable(&self) -> bool {
        matches!(
            self,
            ProviderError::RateLimited(_)
                | ProviderError::Server { .. }
                | ProviderError::Timeout(_)
                | ProviderError::Network(_)
        )
    }

    /// Machine-readable code for API error payloads.
    pub fn code(&self) -> &'static str {
        match self {
            ProviderError::Auth(_) => "AUTH_ERROR",
            ProviderError::Billing(_) => "BILLING_ERROR",
            ProviderError::ApiRequest { .. } => "API_REQUEST_ERROR",
            ProviderError::RateLimited(_) => "RATE_LIMITED",
            ProviderError::Server { .. } => "SERVER_ERROR",
            ProviderError::Timeout(_) => "NETWORK_ERROR",
            ProviderError::Network(_) => "NETWORK_ERROR",
            ProviderError::Configuration(_) => "CONFIGURATION_ERROR",
            ProviderError::InvalidResponse(_) => "INVALID_RESPONSE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retriable_kinds() {
        assert!(ProviderError::RateLimited("slow down".into()).is_retriable());
        assert!(ProviderError::Server {
            status: 503,
            message: "overloaded".into()
        }
        .is_retriable());
        assert!(ProviderError::Timeout("60s elapsed".into()).is_retriable());
        assert!(ProviderError::Network("connection reset".into()).is_retriable());
    }

    #[test]
    fn test_fatal_kinds() {
        assert!(!ProviderError::Auth("bad key".into()).is_retriable());
        assert!(!ProviderError::Billing("credits exhausted".into()).is_retriable());
        assert!(!ProviderError::ApiRequest {
            status: 400,
            message: "unknown model".into()
        }
        .is_retriable());
        assert!(!ProviderError::Configuration("missing key".into()).is_retriable());
        assert!(!ProviderError::InvalidResponse("empty body".into()).is_retriable());
    }
}
