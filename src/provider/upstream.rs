//! HTTP provider backed by an OpenAI-compatible completion server.
//!
//! This is the default wiring for the binary: generation requests are
//! forwarded to a local llama.cpp-style server's `/v1/completions`
//! endpoint. Connection-level failures map to `Unavailable`; anything the
//! server itself reports maps to `Generation`.

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::schema::UpstreamConfig;
use crate::provider::{GenerationParams, ProviderError, TextGenerationProvider};

pub struct UpstreamProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl UpstreamProvider {
    pub fn new(config: &UpstreamConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        }
    }
}

/// Minimal slice of the upstream completion response.
#[derive(Debug, Deserialize)]
struct UpstreamCompletion {
    choices: Vec<UpstreamChoice>,
}

#[derive(Debug, Deserialize)]
struct UpstreamChoice {
    text: String,
}

#[async_trait]
impl TextGenerationProvider for UpstreamProvider {
    async fn generate(
        &self,
        prompt: &str,
        params: GenerationParams,
    ) -> Result<String, ProviderError> {
        let mut body = serde_json::json!({
            "model": self.model,
            "prompt": prompt,
        });
        if let Some(temperature) = params.temperature {
            body["temperature"] = temperature.into();
        }
        if let Some(max_tokens) = params.max_tokens {
            body["max_tokens"] = max_tokens.into();
        }

        let url = format!("{}/v1/completions", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    ProviderError::Unavailable(e.to_string())
                } else {
                    ProviderError::Generation(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, "Upstream completion failed");
            return Err(ProviderError::Generation(format!(
                "upstream returned {}: {}",
                status, detail
            )));
        }

        let completion: UpstreamCompletion = response
            .json()
            .await
            .map_err(|e| ProviderError::Generation(format!("invalid upstream payload: {}", e)))?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.text)
            .ok_or_else(|| ProviderError::Generation("upstream returned no choices".to_string()))
    }
}
