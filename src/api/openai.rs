//! OpenAI API data models for request/response handling.
//!
//! Types match the OpenAI API specification as far as this gateway
//! implements it. The internal conversation model lives in `context`;
//! this module handles the wire-layer mapping.

use serde::{Deserialize, Serialize};

use crate::context::Message;

// =============================================================================
// Chat Completion Request/Response Types
// =============================================================================

/// Request to /v1/chat/completions.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionRequest {
    /// Model name; the gateway serves a single model, so this is advisory.
    #[serde(default)]
    pub model: Option<String>,
    /// Ordered conversation turns.
    pub messages: Vec<IncomingMessage>,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    /// Requests multi-segment generation.
    #[serde(default)]
    pub stream: bool,
}

/// A single incoming chat message with permissive content decoding.
#[derive(Debug, Clone, Deserialize)]
pub struct IncomingMessage {
    pub role: String,
    #[serde(default)]
    pub content: MessageContent,
}

impl From<&IncomingMessage> for Message {
    fn from(incoming: &IncomingMessage) -> Self {
        Message::new(incoming.role.clone(), incoming.content.flatten())
    }
}

/// Message content as clients actually send it. The untagged variants are
/// tried top to bottom; client compatibility depends on this order.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    /// Plain string.
    Text(String),
    /// Array of strings.
    Lines(Vec<String>),
    /// Array of structured parts (`{"type": "text", "text": ...}`).
    Parts(Vec<ContentPart>),
}

impl Default for MessageContent {
    fn default() -> Self {
        MessageContent::Text(String::new())
    }
}

impl MessageContent {
    /// Collapse any accepted shape into one text block.
    pub fn flatten(&self) -> String {
        match self {
            MessageContent::Text(text) => text.clone(),
            MessageContent::Lines(lines) => lines.join("\n"),
            MessageContent::Parts(parts) => parts
                .iter()
                .filter_map(|part| part.text.as_deref())
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

/// One structured content part.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentPart {
    #[serde(default)]
    pub r#type: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

/// Response from /v1/chat/completions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatCompletionResponse {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub model: String,
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatChoice {
    pub index: u32,
    pub message: ResponseMessage,
    pub finish_reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResponseMessage {
    pub role: String,
    pub content: String,
}

impl ChatCompletionResponse {
    pub fn new(model: impl Into<String>, content: String) -> Self {
        Self {
            id: super::chat_completion_id(),
            object: "chat.completion".to_string(),
            created: chrono::Utc::now().timestamp(),
            model: model.into(),
            choices: vec![ChatChoice {
                index: 0,
                message: ResponseMessage {
                    role: "assistant".to_string(),
                    content,
                },
                finish_reason: "stop".to_string(),
            }],
        }
    }
}

// =============================================================================
// Text Completion Request/Response Types
// =============================================================================

/// Request to /v1/completions.
#[derive(Debug, Clone, Deserialize)]
pub struct TextCompletionRequest {
    #[serde(default)]
    pub model: Option<String>,
    pub prompt: PromptInput,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub stream: bool,
}

/// Completion prompt: a string or an array of strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PromptInput {
    Text(String),
    Lines(Vec<String>),
}

impl PromptInput {
    pub fn flatten(&self) -> String {
        match self {
            PromptInput::Text(text) => text.clone(),
            PromptInput::Lines(lines) => lines.join("\n"),
        }
    }
}

/// Response from /v1/completions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextCompletionResponse {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub model: String,
    pub choices: Vec<CompletionChoice>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompletionChoice {
    pub text: String,
    pub index: u32,
    /// Always serialized as an explicit `null`.
    pub logprobs: Option<serde_json::Value>,
    pub finish_reason: String,
}

impl TextCompletionResponse {
    pub fn new(model: impl Into<String>, text: String) -> Self {
        Self {
            id: super::text_completion_id(),
            object: "text_completion".to_string(),
            created: chrono::Utc::now().timestamp(),
            model: model.into(),
            choices: vec![CompletionChoice {
                text,
                index: 0,
                logprobs: None,
                finish_reason: "stop".to_string(),
            }],
        }
    }
}

// =============================================================================
// Models Endpoint Types
// =============================================================================

/// Response from /v1/models.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsResponse {
    pub object: String,
    pub data: Vec<ModelInfo>,
}

/// Information about a single model (OpenAI format).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub owned_by: String,
}
