//! Endpoint handlers: decode, run the generation pipeline, encode.
//!
//! # Responsibilities
//! - Decode wire DTOs; decode failures become 400 error envelopes
//! - Run the chat pipeline (context manager → provider or streamer)
//! - Translate Ollama requests onto the same pipeline
//! - Render catalog endpoints

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;

use crate::api::catalog::ModelCatalog;
use crate::api::ollama::{OllamaChatRequest, OllamaChatResponse};
use crate::api::openai::{
    ChatCompletionRequest, ChatCompletionResponse, TextCompletionRequest, TextCompletionResponse,
};
use crate::config::GatewayConfig;
use crate::context::{ContextManager, Message};
use crate::http::HttpResponse;
use crate::provider::{GenerationParams, ProviderError, TextGenerationProvider};
use crate::stream::SegmentStreamer;

/// Everything the handlers need, constructed once at startup and shared
/// behind the router's Arc.
pub struct GatewayState {
    pub provider: Arc<dyn TextGenerationProvider>,
    pub context: ContextManager,
    pub streamer: SegmentStreamer,
    pub catalog: ModelCatalog,
    max_segments: usize,
}

impl GatewayState {
    pub fn new(provider: Arc<dyn TextGenerationProvider>, config: &GatewayConfig) -> Self {
        let context = ContextManager::new(Arc::clone(&provider), config.context.clone());
        let streamer = SegmentStreamer::new(
            Arc::clone(&provider),
            context.clone(),
            config.streamer.clone(),
            config.context.max_context_tokens,
            config.context.budget_floor_tokens,
        );
        Self {
            provider,
            context,
            streamer,
            catalog: ModelCatalog::from_config(&config.model),
            max_segments: config.streamer.max_segments,
        }
    }
}

/// POST /v1/chat/completions
pub async fn chat_completions(state: &GatewayState, body: &[u8]) -> HttpResponse {
    let request: ChatCompletionRequest = match serde_json::from_slice(body) {
        Ok(request) => request,
        Err(e) => {
            return HttpResponse::json_error(400, format!("invalid chat completion request: {}", e))
        }
    };
    let model = request
        .model
        .unwrap_or_else(|| state.catalog.name.clone());
    let messages: Vec<Message> = request.messages.iter().map(Message::from).collect();

    match generate_chat_content(
        state,
        &messages,
        request.stream,
        request.temperature,
        request.max_tokens,
    )
    .await
    {
        Ok(content) => HttpResponse::json(200, &ChatCompletionResponse::new(model, content)),
        Err(e) => HttpResponse::json_error(400, e.to_string()),
    }
}

/// POST /v1/completions
pub async fn text_completions(state: &GatewayState, body: &[u8]) -> HttpResponse {
    let request: TextCompletionRequest = match serde_json::from_slice(body) {
        Ok(request) => request,
        Err(e) => {
            return HttpResponse::json_error(400, format!("invalid completion request: {}", e))
        }
    };
    let model = request
        .model
        .unwrap_or_else(|| state.catalog.name.clone());
    let params = GenerationParams {
        temperature: request.temperature,
        max_tokens: request.max_tokens,
    };

    match state.provider.generate(&request.prompt.flatten(), params).await {
        Ok(text) => HttpResponse::json(200, &TextCompletionResponse::new(model, text)),
        Err(e) => HttpResponse::json_error(400, e.to_string()),
    }
}

/// GET /v1/models
pub fn list_models(state: &GatewayState) -> HttpResponse {
    HttpResponse::json(200, &state.catalog.models_response())
}

/// GET /v1/models/{id}
pub fn get_model(state: &GatewayState, id: &str) -> HttpResponse {
    if state.catalog.contains(id) {
        HttpResponse::json(200, &state.catalog.model_info())
    } else {
        HttpResponse::json_error(404, format!("model '{}' not found", id))
    }
}

/// POST /api/chat
pub async fn ollama_chat(state: &GatewayState, body: &[u8]) -> HttpResponse {
    let request: OllamaChatRequest = match serde_json::from_slice(body) {
        Ok(request) => request,
        Err(e) => return HttpResponse::json_error(400, format!("invalid chat request: {}", e)),
    };
    let model = request
        .model
        .unwrap_or_else(|| state.catalog.name.clone());
    let options = request.options.unwrap_or_default();
    let messages: Vec<Message> = request.messages.iter().map(Message::from).collect();

    let started = Instant::now();
    match generate_chat_content(
        state,
        &messages,
        request.stream,
        options.temperature,
        options.num_predict,
    )
    .await
    {
        Ok(content) => {
            let total_duration = Some(started.elapsed().as_nanos() as u64);
            HttpResponse::json(200, &OllamaChatResponse::new(model, content, total_duration))
        }
        Err(e) => HttpResponse::json_error(400, e.to_string()),
    }
}

/// GET /api/tags
pub fn list_tags(state: &GatewayState) -> HttpResponse {
    HttpResponse::json(200, &state.catalog.tags_response())
}

/// The shared chat pipeline behind both chat surfaces.
async fn generate_chat_content(
    state: &GatewayState,
    messages: &[Message],
    stream: bool,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
) -> Result<String, ProviderError> {
    if stream {
        return generate_streamed(state, messages, temperature).await;
    }

    let prepared = state.context.prepare_chat_prompt(messages).await;
    tracing::debug!(fit = ?prepared.fit, prompt_chars = prepared.text.len(), "Prompt prepared");
    state
        .provider
        .generate(
            &prepared.text,
            GenerationParams {
                temperature,
                max_tokens,
            },
        )
        .await
}

/// Multi-segment generation, buffered into one response body. Segments
/// already produced when the provider fails are kept, with an
/// interruption notice appended.
async fn generate_streamed(
    state: &GatewayState,
    messages: &[Message],
    temperature: Option<f32>,
) -> Result<String, ProviderError> {
    let (tx, mut rx) = mpsc::channel(state.max_segments);
    let result = state.streamer.run(messages, temperature, tx).await;

    let mut segments: Vec<String> = Vec::new();
    while let Ok(segment) = rx.try_recv() {
        segments.push(segment);
    }

    match result {
        Ok(()) => Ok(segments.concat()),
        Err(e) if segments.is_empty() => Err(e),
        Err(e) => {
            tracing::warn!(error = %e, emitted = segments.len(), "Generation interrupted mid-stream");
            Ok(format!(
                "{}\n\n[generation interrupted: {}]",
                segments.concat(),
                e
            ))
        }
    }
}
