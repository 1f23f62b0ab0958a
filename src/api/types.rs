//! API request and response types

use serde::{Deserialize, Serialize};

/// Inbound webhook message
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub conversation_id: String,
    pub text: String,
}

/// Replies produced by one turn, in send order
#[derive(Debug, Serialize)]
pub struct SendMessageResponse {
    pub replies: Vec<String>,
}

/// Response with conversation state and transcript
#[derive(Debug, Serialize)]
pub struct ConversationDetailResponse {
    pub conversation: serde_json::Value,
    pub messages: Vec<serde_json::Value>,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
