//! Multi-segment generation subsystem.
//!
//! # Data Flow
//! ```text
//! conversation
//!     → context manager (bounded prompt + compact summary for reuse)
//!     → round 1: full bounded prompt
//!     → rounds 2..N: compact summary + tail of text so far
//!     → each non-empty segment emitted through a bounded channel
//!     → stop when a round falls behind the pace heuristic, or at max
//! ```
//!
//! # Design Decisions
//! - Per-segment emission through `tokio::sync::mpsc`; the consumer
//!   decides whether to stream or buffer
//! - Later rounds never resend the full prompt; the compact summary
//!   keeps round cost flat
//! - A provider failure aborts the run; the caller owns partial-output
//!   communication

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::config::schema::StreamerConfig;
use crate::context::budget::ContextBudget;
use crate::context::{estimate_tokens, last_chars, ContextManager, Message};
use crate::provider::{GenerationParams, ProviderError, TextGenerationProvider};

/// Drives up to `max_segments` bounded generation rounds.
#[derive(Clone)]
pub struct SegmentStreamer {
    provider: Arc<dyn TextGenerationProvider>,
    context: ContextManager,
    config: StreamerConfig,
    max_context_tokens: usize,
    budget_floor_tokens: usize,
}

impl SegmentStreamer {
    pub fn new(
        provider: Arc<dyn TextGenerationProvider>,
        context: ContextManager,
        config: StreamerConfig,
        max_context_tokens: usize,
        budget_floor_tokens: usize,
    ) -> Self {
        Self {
            provider,
            context,
            config,
            max_context_tokens,
            budget_floor_tokens,
        }
    }

    /// Generate a long-form answer in segments, sending each completed
    /// segment through `emit` in order. Channels sized `max_segments` (or
    /// larger) never block the run.
    ///
    /// Any provider failure aborts the whole run; segments already
    /// emitted stay with the consumer.
    pub async fn run(
        &self,
        messages: &[Message],
        temperature: Option<f32>,
        emit: mpsc::Sender<String>,
    ) -> Result<(), ProviderError> {
        let prepared = self
            .context
            .prepare_with_reserve(messages, self.config.output_reserve)
            .await;
        // Resending the full prompt every round would itself overflow the
        // budget; later rounds reuse this compact rendition.
        let compact = self
            .context
            .summarize(&prepared.text, self.config.compact_summary_chars)
            .await;

        let round_budget = ContextBudget::new(
            self.max_context_tokens,
            self.config.output_reserve,
            self.budget_floor_tokens,
        );
        let params = GenerationParams {
            temperature,
            max_tokens: Some(self.config.output_reserve as u32),
        };

        let mut so_far = String::new();
        for round in 1..=self.config.max_segments {
            let prompt = self.round_prompt(round, &prepared.text, &compact, &so_far, round_budget);

            tracing::debug!(
                round,
                prompt_tokens = estimate_tokens(&prompt),
                accumulated_chars = so_far.len(),
                "Generation round starting"
            );

            let segment = self.provider.generate(&prompt, params).await?;
            if !segment.is_empty() {
                so_far.push_str(&segment);
                if emit.send(segment).await.is_err() {
                    // Consumer stopped listening; nothing left to do.
                    tracing::debug!(round, "Segment receiver dropped, stopping");
                    return Ok(());
                }
            }

            if !self.keeps_pace(round, so_far.len()) {
                tracing::debug!(round, accumulated_chars = so_far.len(), "Early stop");
                break;
            }
        }
        Ok(())
    }

    /// Round 1 sends the full bounded prompt. Later rounds combine the
    /// no-repeat instructions (with a tail of the text so far) and the
    /// compact summary, shrinking the tail until the round budget fits.
    fn round_prompt(
        &self,
        round: usize,
        full_prompt: &str,
        compact: &str,
        so_far: &str,
        budget: ContextBudget,
    ) -> String {
        if round == 1 {
            return full_prompt.to_string();
        }

        let base = format!("{}\nassistant:", compact);
        let mut tail_len = self.config.tail_chars;
        loop {
            let combined = format!("{}{}", Self::continuation_instructions(so_far, tail_len), base);
            if budget.fits(&combined) || tail_len <= self.config.tail_floor_chars {
                return combined;
            }
            tail_len = (tail_len / 2).max(self.config.tail_floor_chars);
        }
    }

    fn continuation_instructions(so_far: &str, tail_len: usize) -> String {
        format!(
            "Continue the answer below. The end of what you have already \
             written is shown between the markers; do not repeat it.\n\
             ---\n{}\n---\n",
            last_chars(so_far, tail_len)
        )
    }

    /// Pace heuristic: after round N the accumulated text must reach
    /// `segment_chars * (N - 1) + continue_ratio * segment_chars`. A short
    /// round means the provider wound the answer down.
    fn keeps_pace(&self, round: usize, accumulated_chars: usize) -> bool {
        let threshold = self.config.segment_chars as f64 * (round as f64 - 1.0)
            + self.config.continue_ratio * self.config.segment_chars as f64;
        accumulated_chars as f64 >= threshold
    }
}
