//! Google Gemini provider implementation.
//!
//! Implements the [`provider_core::Provider`] trait against the Gemini
//! `generateContent` endpoint. One HTTP request per call; retries and
//! circuit-breaker state belong to the caller.

mod api_types;
mod client;
mod config;

pub use client::GeminiProvider;
pub use config::{GeminiConfig, GeminiConfigBuilder};

// Re-export core types for convenience
pub use provider_core::{Completion, CompletionRequest, Provider, ProviderError, TokenUsage};
