//! Ollama API data models.
//!
//! Ollama-format requests are translated into the internal conversation
//! model, run through the same pipeline as the OpenAI endpoints, and the
//! result is translated back into Ollama response shapes.

use serde::{Deserialize, Serialize};

use crate::api::openai::{IncomingMessage, ResponseMessage};

/// Request to /api/chat.
#[derive(Debug, Clone, Deserialize)]
pub struct OllamaChatRequest {
    #[serde(default)]
    pub model: Option<String>,
    pub messages: Vec<IncomingMessage>,
    #[serde(default)]
    pub stream: bool,
    #[serde(default)]
    pub options: Option<OllamaOptions>,
}

/// Generation options nested under `options`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OllamaOptions {
    #[serde(default)]
    pub temperature: Option<f32>,
    /// Ollama's name for the max output token count.
    #[serde(default)]
    pub num_predict: Option<u32>,
}

/// Response from /api/chat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaChatResponse {
    pub model: String,
    /// RFC3339 timestamp.
    pub created_at: String,
    pub message: ResponseMessage,
    pub done: bool,
    /// Wall-clock duration in nanoseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_duration: Option<u64>,
}

impl OllamaChatResponse {
    pub fn new(model: impl Into<String>, content: String, total_duration: Option<u64>) -> Self {
        Self {
            model: model.into(),
            created_at: chrono::Utc::now().to_rfc3339(),
            message: ResponseMessage {
                role: "assistant".to_string(),
                content,
            },
            done: true,
            total_duration,
        }
    }
}

/// Response from /api/tags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagsResponse {
    pub models: Vec<TagModel>,
}

/// One locally available model as Ollama describes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagModel {
    pub name: String,
    pub modified_at: String,
    pub size: u64,
    pub digest: String,
    pub details: TagDetails,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagDetails {
    pub format: String,
    pub family: String,
    pub families: Vec<String>,
    pub parameter_size: String,
    pub quantization_level: String,
}
