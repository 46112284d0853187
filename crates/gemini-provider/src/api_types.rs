//! Gemini generateContent request and response types.

use serde::{Deserialize, Serialize};

/// One text part.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    /// Text payload
    #[serde(default)]
    pub text: String,
}

/// A content block: a list of parts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    /// Parts making up this content
    pub parts: Vec<Part>,
}

impl Content {
    /// Create a content block from one text string.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            parts: vec![Part { text: text.into() }],
        }
    }
}

/// Sampling parameters.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Temperature for generation
    pub temperature: f32,
    /// Maximum output tokens
    pub max_output_tokens: u32,
    /// Nucleus sampling parameter (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
}

/// Request body for generateContent.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// User content
    pub contents: Vec<Content>,
    /// System instruction
    pub system_instruction: Content,
    /// Sampling parameters
    pub generation_config: GenerationConfig,
}

/// Response body from generateContent.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Generated candidates
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    /// Token accounting
    #[serde(default)]
    pub usage_metadata: Option<UsageMetadata>,
}

/// One generated candidate.
#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    /// Candidate content
    #[serde(default)]
    pub content: Option<Content>,
}

/// Token accounting reported by the API.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    /// Tokens in the prompt
    #[serde(default)]
    pub prompt_token_count: u32,
    /// Tokens generated across candidates
    #[serde(default)]
    pub candidates_token_count: u32,
    /// Total tokens
    #[serde(default)]
    pub total_token_count: u32,
}

/// API error response.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    /// Error details
    pub error: ApiErrorDetails,
}

/// API error details.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetails {
    /// Error message
    #[serde(default)]
    pub message: String,
    /// Structured detail entries, may carry a machine-readable reason
    #[serde(default)]
    pub details: Vec<serde_json::Value>,
}

impl ApiErrorDetails {
    /// First machine-readable reason among the detail entries, if any.
    pub fn reason(&self) -> Option<&str> {
        self.details
            .iter()
            .find_map(|detail| detail.get("reason").and_then(|r| r.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_camel_case() {
        let request = GenerateContentRequest {
            contents: vec![Content::from_text("Write about Rust")],
            system_instruction: Content::from_text("You are a writer"),
            generation_config: GenerationConfig {
                temperature: 0.7,
                max_output_tokens: 650,
                top_p: None,
            },
        };

        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("systemInstruction").is_some());
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 650);
        assert!(json["generationConfig"].get("topP").is_none());
    }

    #[test]
    fn test_response_deserializes() {
        let body = r##"{
            "candidates": [{"content": {"parts": [{"text": "# Title"}, {"text": "\nBody"}]}}],
            "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 90, "totalTokenCount": 102}
        }"##;

        let response: GenerateContentResponse = serde_json::from_str(body).unwrap();
        let content = response.candidates[0].content.as_ref().unwrap();
        assert_eq!(content.parts.len(), 2);
        assert_eq!(response.usage_metadata.unwrap().total_token_count, 102);
    }

    #[test]
    fn test_error_reason_extraction() {
        let body = r#"{"error": {"message": "API key expired", "details": [
            {"@type": "type.googleapis.com/google.rpc.ErrorInfo", "reason": "API_KEY_INVALID"}
        ]}}"#;

        let parsed: ApiErrorBody = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.error.reason(), Some("API_KEY_INVALID"));
    }
}
