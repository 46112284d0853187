//! API error responses.
//!
//! Every error renders as `{"error": {"code", "message", "details"}}` with
//! the HTTP status mapped from the error kind.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use database::DatabaseError;
use generation::GenerationError;
use serde_json::{json, Value};
use thiserror::Error;

/// Errors surfaced by API handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request rejected before reaching the pipeline.
    #[error("{0}")]
    InvalidInput(String),

    /// Generation pipeline error.
    #[error(transparent)]
    Generation(#[from] GenerationError),

    /// Persistence error.
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl ApiError {
    fn code(&self) -> String {
        match self {
            ApiError::InvalidInput(_) => "INVALID_INPUT".to_string(),
            ApiError::Generation(err) => err.code().to_string(),
            ApiError::Database(DatabaseError::NotFound { entity, .. }) => {
                format!("{}_NOT_FOUND", entity.to_uppercase())
            }
            ApiError::Database(_) => "DATABASE_ERROR".to_string(),
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::Generation(GenerationError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            ApiError::Generation(GenerationError::PersonaNotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Generation(GenerationError::ProviderUnavailable { .. }) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ApiError::Generation(GenerationError::Provider(_))
            | ApiError::Generation(GenerationError::Api { .. }) => StatusCode::BAD_GATEWAY,
            ApiError::Generation(GenerationError::Database(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Database(DatabaseError::NotFound { .. }) => StatusCode::NOT_FOUND,
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn details(&self) -> Value {
        match self {
            ApiError::Generation(GenerationError::ProviderUnavailable {
                provider,
                retry_after_seconds,
            }) => json!({
                "provider": provider,
                "retry_after_seconds": retry_after_seconds,
            }),
            _ => json!({}),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }

        let body = json!({
            "error": {
                "code": self.code(),
                "message": self.to_string(),
                "details": self.details(),
            }
        });

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers.
pub type Result<T> = std::result::Result<T, ApiError>;
