//! Mock provider implementations for orchestration tests.
//!
//! This crate provides mock implementations of the `Provider` trait:
//! - `StaticProvider` - Returns a fixed completion on every call
//! - `FailingProvider` - Returns a configured error on every call
//! - `ScriptedProvider` - Plays back a sequence of outcomes and counts calls
//!
//! For production generation, use the `anthropic-provider` or
//! `gemini-provider` crates instead.
//!
//! # Example
//!
//! ```rust
//! use mock_provider::{Provider, StaticProvider};
//! # use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), mock_provider::ProviderError> {
//!     let provider = StaticProvider::new("# Title\nShort body");
//!     let request = mock_provider::CompletionRequest {
//!         system_prompt: "system".into(),
//!         user_prompt: "user".into(),
//!         model: "mock".into(),
//!         temperature: 0.7,
//!         max_tokens: 650,
//!         top_p: None,
//!         timeout: Duration::from_secs(1),
//!     };
//!     let completion = provider.complete(request).await?;
//!     println!("{}", completion.text);
//!     Ok(())
//! }
//! ```

mod failing;
mod scripted;
mod static_text;

pub use failing::FailingProvider;
pub use scripted::ScriptedProvider;
pub use static_text::StaticProvider;

// Re-export provider-core types for convenience
pub use provider_core::{
    async_trait, Completion, CompletionRequest, Provider, ProviderError, TokenUsage,
};
