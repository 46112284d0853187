//! Core trait and types for LLM provider clients.
//!
//! This crate provides the shared interface for all provider implementations
//! in the blog generation backend. It defines:
//!
//! - [`Provider`] - The trait every LLM backend implements
//! - [`CompletionRequest`] / [`Completion`] - Call input/output types
//! - [`ProviderError`] - The uniform error taxonomy providers map into
//!
//! A provider issues exactly one HTTP request per [`Provider::complete`]
//! call and applies the request timeout as a hard deadline. Retries and
//! circuit-breaker bookkeeping belong to the caller, so retry policy can
//! vary per call site.
//!
//! # Example
//!
//! ```rust
//! use provider_core::{Completion, CompletionRequest, Provider, ProviderError, TokenUsage};
//! use async_trait::async_trait;
//!
//! struct MyProvider;
//!
//! #[async_trait]
//! impl Provider for MyProvider {
//!     async fn complete(&self, _request: CompletionRequest) -> Result<Completion, ProviderError> {
//!         Ok(Completion {
//!             text: "# Hello".to_string(),
//!             usage: TokenUsage::default(),
//!         })
//!     }
//!
//!     fn name(&self) -> &str {
//!         "my-provider"
//!     }
//!
//!     fn default_model(&self) -> &str {
//!         "my-model"
//!     }
//!
//!     fn fast_model(&self) -> &str {
//!         "my-model-mini"
//!     }
//! }
//! ```

mod error;
mod request;
mod trait_def;

pub use error::ProviderError;
pub use request::{Completion, CompletionRequest, TokenUsage};
pub use trait_def::Provider;

// Re-export async_trait for convenience
pub use async_trait::async_trait;
