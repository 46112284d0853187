//! Anthropic Messages API request and response types.

use serde::{Deserialize, Serialize};

/// A single message in the request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Role: "user" or "assistant"
    pub role: String,
    /// Message content
    pub content: String,
}

impl Message {
    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Request body for the Messages endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct MessagesRequest {
    /// Model to use
    pub model: String,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Temperature for generation
    pub temperature: f32,
    /// Nucleus sampling parameter (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    /// System prompt
    pub system: String,
    /// Conversation messages
    pub messages: Vec<Message>,
}

/// Response body from the Messages endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct MessagesResponse {
    /// Content blocks
    pub content: Vec<ContentBlock>,
    /// Token usage
    pub usage: Usage,
}

/// One content block in the response.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentBlock {
    /// Block type ("text" for generated prose)
    #[serde(rename = "type")]
    pub block_type: String,
    /// Text payload, present for text blocks
    #[serde(default)]
    pub text: String,
}

/// Token usage reported by the API.
#[derive(Debug, Clone, Deserialize)]
pub struct Usage {
    /// Tokens in the prompt
    pub input_tokens: u32,
    /// Tokens generated
    pub output_tokens: u32,
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
    /// Error type (e.g. "authentication_error")
    #[serde(rename = "type")]
    pub error_type: Option<String>,
    /// Error message
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_without_top_p() {
        let request = MessagesRequest {
            model: "claude-3-5-sonnet-20241022".to_string(),
            max_tokens: 650,
            temperature: 0.7,
            top_p: None,
            system: "You are a writer".to_string(),
            messages: vec![Message::user("Write about Rust")],
        };

        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("top_p").is_none());
        assert_eq!(json["max_tokens"], 650);
        assert_eq!(json["messages"][0]["role"], "user");
    }

    #[test]
    fn test_response_deserializes() {
        let body = r##"{
            "content": [{"type": "text", "text": "# Title\nBody"}],
            "usage": {"input_tokens": 42, "output_tokens": 180}
        }"##;

        let response: MessagesResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.content[0].text, "# Title\nBody");
        assert_eq!(response.usage.output_tokens, 180);
    }

    #[test]
    fn test_error_body_deserializes() {
        let body = r#"{"error": {"type": "authentication_error", "message": "invalid x-api-key"}}"#;
        let parsed: ApiErrorBody = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.error.message, "invalid x-api-key");
    }
}
