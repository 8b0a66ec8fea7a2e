//! The single-entry model catalog.
//!
//! The gateway fronts one on-device model. Config describes it once and
//! the OpenAI and Ollama listing endpoints render from this shared view.

use crate::api::ollama::{TagDetails, TagModel, TagsResponse};
use crate::api::openai::{ModelInfo, ModelsResponse};
use crate::config::schema::ModelConfig;

#[derive(Debug, Clone)]
pub struct ModelCatalog {
    pub name: String,
    pub owned_by: String,
    pub family: String,
    pub parameter_size: String,
    pub quantization_level: String,
    pub size_bytes: u64,
    /// Fixed at construction; the catalog never changes at runtime.
    pub created: i64,
}

impl ModelCatalog {
    pub fn from_config(config: &ModelConfig) -> Self {
        Self {
            name: config.name.clone(),
            owned_by: config.owned_by.clone(),
            family: config.family.clone(),
            parameter_size: config.parameter_size.clone(),
            quantization_level: config.quantization_level.clone(),
            size_bytes: config.size_bytes,
            created: chrono::Utc::now().timestamp(),
        }
    }

    /// Whether `id` names the served model.
    pub fn contains(&self, id: &str) -> bool {
        self.name == id
    }

    pub fn model_info(&self) -> ModelInfo {
        ModelInfo {
            id: self.name.clone(),
            object: "model".to_string(),
            created: self.created,
            owned_by: self.owned_by.clone(),
        }
    }

    pub fn models_response(&self) -> ModelsResponse {
        ModelsResponse {
            object: "list".to_string(),
            data: vec![self.model_info()],
        }
    }

    pub fn tags_response(&self) -> TagsResponse {
        TagsResponse {
            models: vec![TagModel {
                name: self.name.clone(),
                modified_at: chrono::Utc::now().to_rfc3339(),
                size: self.size_bytes,
                digest: self.digest(),
                details: TagDetails {
                    format: "local".to_string(),
                    family: self.family.clone(),
                    families: vec![self.family.clone()],
                    parameter_size: self.parameter_size.clone(),
                    quantization_level: self.quantization_level.clone(),
                },
            }],
        }
    }

    /// Stable synthetic digest derived from the model name; there is no
    /// real blob to hash.
    fn digest(&self) -> String {
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for byte in self.name.bytes() {
            hash ^= u64::from(byte);
            hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
        }
        format!("{:016x}", hash)
    }
}
