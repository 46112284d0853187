//! Generation pipeline errors.

use provider_core::ProviderError;
use thiserror::Error;

/// Errors surfaced by the generation pipeline.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Input rejected before any record was created.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Unknown or inactive persona slug.
    #[error("active persona '{0}' not found")]
    PersonaNotFound(String),

    /// Circuit breaker is open for the provider.
    #[error("{provider} provider temporarily unavailable, retry in ~{retry_after_seconds}s")]
    ProviderUnavailable {
        provider: String,
        retry_after_seconds: u64,
    },

    /// Fatal provider error, not retried.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Retries exhausted; wraps the last underlying cause.
    #[error("failed to generate content after retry attempts ({provider}): {last_error}")]
    Api {
        provider: String,
        last_error: ProviderError,
    },

    /// Persistence failure.
    #[error(transparent)]
    Database(#[from] database::DatabaseError),
}

impl GenerationError {
    /// Machine-readable error code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            GenerationError::InvalidInput(_) => "INVALID_INPUT",
            GenerationError::PersonaNotFound(_) => "PERSONA_NOT_FOUND",
            GenerationError::ProviderUnavailable { .. } => "PROVIDER_UNAVAILABLE",
            GenerationError::Provider(err) => err.code(),
            GenerationError::Api { .. } => "API_ERROR",
            GenerationError::Database(_) => "DATABASE_ERROR",
        }
    }
}

/// Result type for generation operations.
pub type Result<T> = std::result::Result<T, GenerationError>;
