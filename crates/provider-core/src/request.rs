//! Completion request and response types.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Parameters for a single generation call.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// System prompt steering tone and structure.
    pub system_prompt: String,
    /// User prompt carrying the topic and requirements.
    pub user_prompt: String,
    /// Model identifier, already resolved for the requested speed.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Maximum output tokens.
    pub max_tokens: u32,
    /// Nucleus sampling top-p, if the persona configures one.
    pub top_p: Option<f32>,
    /// Hard deadline for the HTTP call.
    pub timeout: Duration,
}

/// Normalized result of a generation call.
#[derive(Debug, Clone)]
pub struct Completion {
    /// Raw generated text.
    pub text: String,
    /// Token accounting reported by the provider.
    pub usage: TokenUsage,
}

/// Token usage for one call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub total_tokens: u32,
}

impl TokenUsage {
    /// Build usage from input/output counts, deriving the total.
    pub fn from_counts(input_tokens: u32, output_tokens: u32) -> Self {
        Self {
            input_tokens,
            output_tokens,
            total_tokens: input_tokens + output_tokens,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_from_counts() {
        let usage = TokenUsage::from_counts(120, 480);
        assert_eq!(usage.total_tokens, 600);
    }
}
