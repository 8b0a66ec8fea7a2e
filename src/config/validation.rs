//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (ports, budgets, ratios)
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use crate::config::schema::GatewayConfig;

/// A single semantic configuration problem.
#[derive(Debug)]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

/// Validate semantic constraints on a parsed configuration.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.port == 0 {
        errors.push(ValidationError::new("listener.port", "must be non-zero"));
    }
    if config.listener.max_message_bytes == 0 {
        errors.push(ValidationError::new(
            "listener.max_message_bytes",
            "must be non-zero",
        ));
    }
    if config.context.output_reserve >= config.context.max_context_tokens {
        errors.push(ValidationError::new(
            "context.output_reserve",
            "must be smaller than max_context_tokens",
        ));
    }
    if config.context.recent_messages == 0 {
        errors.push(ValidationError::new(
            "context.recent_messages",
            "must be at least 1",
        ));
    }
    if config.streamer.max_segments == 0 {
        errors.push(ValidationError::new(
            "streamer.max_segments",
            "must be at least 1",
        ));
    }
    if !(config.streamer.continue_ratio > 0.0 && config.streamer.continue_ratio <= 1.0) {
        errors.push(ValidationError::new(
            "streamer.continue_ratio",
            "must be in (0, 1]",
        ));
    }
    if config.streamer.tail_floor_chars > config.streamer.tail_chars {
        errors.push(ValidationError::new(
            "streamer.tail_floor_chars",
            "must not exceed tail_chars",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
