//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind host, port, message limits).
    pub listener: ListenerConfig,

    /// The single on-device model the gateway advertises.
    pub model: ModelConfig,

    /// Context-window budgeting and summarization settings.
    pub context: ContextConfig,

    /// Multi-segment generation settings.
    pub streamer: StreamerConfig,

    /// Upstream text-generation engine endpoint.
    pub upstream: UpstreamConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Host to bind (loopback by default; this is a local service).
    pub bind_host: String,

    /// TCP port. Ollama's default port keeps existing clients working.
    pub port: u16,

    /// Maximum accepted HTTP message size in bytes (headers + body).
    pub max_message_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_host: "127.0.0.1".to_string(),
            port: 11434,
            max_message_bytes: 2 * 1024 * 1024,
        }
    }
}

/// Description of the advertised model.
///
/// The gateway fronts exactly one on-device model; these fields feed the
/// `/v1/models` and `/api/tags` catalogs.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Model identifier reported to clients.
    pub name: String,

    /// `owned_by` field in OpenAI model listings.
    pub owned_by: String,

    /// Model family reported in Ollama tag details.
    pub family: String,

    /// Parameter count label (e.g. "3B").
    pub parameter_size: String,

    /// Quantization label reported in Ollama tag details.
    pub quantization_level: String,

    /// Approximate on-disk size in bytes reported in Ollama tags.
    pub size_bytes: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: "apple.local:latest".to_string(),
            owned_by: "apple".to_string(),
            family: "foundation".to_string(),
            parameter_size: "3B".to_string(),
            quantization_level: "Q4".to_string(),
            size_bytes: 3_200_000_000,
        }
    }
}

/// Context-window budgeting configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ContextConfig {
    /// Approximate context window of the model, in tokens.
    pub max_context_tokens: usize,

    /// Tokens reserved for the model's output on single-shot requests.
    pub output_reserve: usize,

    /// Lower bound on the prompt budget regardless of reserve size.
    pub budget_floor_tokens: usize,

    /// Number of most-recent messages kept verbatim when compressing.
    pub recent_messages: usize,

    /// Character cap applied to the older-messages block before
    /// summarization (head/tail slices joined with an ellipsis).
    pub older_clamp_chars: usize,

    /// Target size of the first summarization pass, in characters.
    pub summary_target_chars: usize,

    /// Target size of the second, tighter summarization pass.
    pub tight_summary_target_chars: usize,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            max_context_tokens: 4000,
            output_reserve: 512,
            budget_floor_tokens: 1200,
            recent_messages: 6,
            older_clamp_chars: 6000,
            summary_target_chars: 1500,
            tight_summary_target_chars: 800,
        }
    }
}

/// Multi-segment generation configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StreamerConfig {
    /// Maximum number of generation rounds.
    pub max_segments: usize,

    /// Target characters per segment; drives the continuation heuristic.
    pub segment_chars: usize,

    /// Characters of already-generated text replayed to later rounds.
    pub tail_chars: usize,

    /// Smallest tail the budget shrinker will go down to.
    pub tail_floor_chars: usize,

    /// Fraction of `segment_chars` a round must keep pace with for the
    /// loop to continue. Tuned against observed provider output lengths;
    /// kept configurable for recalibration.
    pub continue_ratio: f64,

    /// Tokens reserved for output on each streaming round.
    pub output_reserve: usize,

    /// Target characters for the compact prompt summary reused by
    /// rounds after the first.
    pub compact_summary_chars: usize,
}

impl Default for StreamerConfig {
    fn default() -> Self {
        Self {
            max_segments: 4,
            segment_chars: 900,
            tail_chars: 1500,
            tail_floor_chars: 200,
            continue_ratio: 0.6,
            output_reserve: 800,
            compact_summary_chars: 800,
        }
    }
}

/// Upstream text-generation engine configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of an OpenAI-compatible completion server.
    pub url: String,

    /// Model name forwarded to the upstream engine.
    pub model: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:8080".to_string(),
            model: "default".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
