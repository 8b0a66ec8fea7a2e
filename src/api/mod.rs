//! Wire-format DTOs for the OpenAI and Ollama surfaces.
//!
//! These types carry no behavior beyond (de)serialization and mapping
//! into the internal conversation model. Endpoint semantics live in the
//! routing layer.

pub mod catalog;
pub mod ollama;
pub mod openai;

pub use catalog::ModelCatalog;

use serde::{Deserialize, Serialize};

/// JSON error envelope returned by matched routes: `{"error": {"message": ...}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub message: String,
}

impl ErrorEnvelope {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                message: message.into(),
            },
        }
    }
}

/// Fresh chat-completion response id (`chatcmpl_` + hex token).
pub fn chat_completion_id() -> String {
    format!("chatcmpl_{}", uuid::Uuid::new_v4().simple())
}

/// Fresh text-completion response id (`cmpl_` + hex token).
pub fn text_completion_id() -> String {
    format!("cmpl_{}", uuid::Uuid::new_v4().simple())
}
