//! Anthropic Messages API provider implementation.
//!
//! Implements the [`provider_core::Provider`] trait against the Anthropic
//! Messages endpoint. One HTTP request per call; the caller owns retries
//! and circuit-breaker state.

mod api_types;
mod client;
mod config;

pub use client::AnthropicProvider;
pub use config::{AnthropicConfig, AnthropicConfigBuilder};

// Re-export core types for convenience
pub use provider_core::{Completion, CompletionRequest, Provider, ProviderError, TokenUsage};
