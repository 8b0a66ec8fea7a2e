//! Prompt preparation against a fixed context budget.
//!
//! # Responsibilities
//! - Render conversations into provider prompts
//! - Pass short conversations through untouched
//! - Compress older turns via provider summarization, twice if needed
//! - Degrade to an extractive fallback when the provider cannot summarize

use std::sync::Arc;

use crate::config::schema::ContextConfig;
use crate::context::budget::ContextBudget;
use crate::context::{last_chars, truncate_chars, Message};
use crate::provider::{GenerationParams, TextGenerationProvider};

/// How the prepared prompt relates to the original conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptFit {
    /// Whole conversation fit the budget verbatim.
    Full,
    /// Older turns compressed once.
    Summarized,
    /// Second, tighter compression pass was required.
    SummaryTight,
}

/// A provider-ready prompt plus how it was produced.
#[derive(Debug, Clone)]
pub struct PreparedPrompt {
    pub text: String,
    pub fit: PromptFit,
}

/// Prepares bounded prompts for the generation provider.
#[derive(Clone)]
pub struct ContextManager {
    provider: Arc<dyn TextGenerationProvider>,
    config: ContextConfig,
}

impl ContextManager {
    pub fn new(provider: Arc<dyn TextGenerationProvider>, config: ContextConfig) -> Self {
        Self { provider, config }
    }

    /// Render a conversation as `role: content` lines with a trailing
    /// cue for the assistant's next turn.
    pub fn render_prompt(messages: &[Message]) -> String {
        let mut text = Self::render_block(messages);
        if !text.is_empty() {
            text.push('\n');
        }
        text.push_str("assistant:");
        text
    }

    /// Render without the trailing cue.
    fn render_block(messages: &[Message]) -> String {
        messages
            .iter()
            .map(|m| format!("{}: {}", m.role, m.content))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Bound a conversation using the default single-shot output reserve.
    pub async fn prepare_chat_prompt(&self, messages: &[Message]) -> PreparedPrompt {
        self.prepare_with_reserve(messages, self.config.output_reserve)
            .await
    }

    /// Bound a conversation with an explicit output reserve (the segment
    /// streamer reserves more room per round).
    pub async fn prepare_with_reserve(
        &self,
        messages: &[Message],
        reserve_for_output: usize,
    ) -> PreparedPrompt {
        let budget = ContextBudget::new(
            self.config.max_context_tokens,
            reserve_for_output,
            self.config.budget_floor_tokens,
        );

        let full = Self::render_prompt(messages);
        if budget.fits(&full) {
            return PreparedPrompt {
                text: full,
                fit: PromptFit::Full,
            };
        }

        let recent_len = self.config.recent_messages.min(messages.len());
        let split = messages.len() - recent_len;
        let (older, recent) = messages.split_at(split);

        if older.is_empty() {
            // Nothing to compress; the recent turns alone exceed budget.
            tracing::warn!(
                estimated_tokens = crate::context::estimate_tokens(&full),
                budget = budget.prompt_tokens(),
                "Conversation over budget with no older turns to compress"
            );
            return PreparedPrompt {
                text: full,
                fit: PromptFit::Full,
            };
        }

        let older_text = Self::clamp_middle(
            &Self::render_block(older),
            self.config.older_clamp_chars,
        );

        let summary = self
            .summarize(&older_text, self.config.summary_target_chars)
            .await;
        let composed = Self::compose(&summary, recent);
        if budget.fits(&composed) {
            return PreparedPrompt {
                text: composed,
                fit: PromptFit::Summarized,
            };
        }

        // Still too large: one tighter pass, never more.
        let tight = self
            .summarize(&older_text, self.config.tight_summary_target_chars)
            .await;
        let composed = Self::compose(&tight, recent);
        PreparedPrompt {
            text: composed,
            fit: PromptFit::SummaryTight,
        }
    }

    fn compose(summary: &str, recent: &[Message]) -> String {
        format!(
            "system: Conversation summary (compressed): \n{}\n{}",
            summary,
            Self::render_prompt(recent)
        )
    }

    /// Compress `text` to under `target_chars` via the provider; degrade
    /// to an extractive summary on any provider failure. The result is
    /// hard-clamped, never re-summarized.
    pub async fn summarize(&self, text: &str, target_chars: usize) -> String {
        let instruction = format!(
            "Compress the following conversation to under {} characters. \
             Preserve technical details, identifiers, and decisions. \
             Reply with only the compressed text.\n\n{}",
            target_chars, text
        );
        let params = GenerationParams {
            temperature: Some(0.2),
            max_tokens: Some((target_chars / 4 + 64) as u32),
        };

        let summary = match self.provider.generate(&instruction, params).await {
            Ok(summary) => summary,
            Err(e) => {
                tracing::warn!(error = %e, "Summarization failed, using extractive fallback");
                Self::extractive_fallback(text)
            }
        };
        truncate_chars(&summary, target_chars).to_string()
    }

    /// Head and tail sentence fragments of `text`, for when no provider
    /// is there to summarize.
    fn extractive_fallback(text: &str) -> String {
        let fragments: Vec<&str> = text
            .split(['.', '!', '?', '\n'])
            .map(str::trim)
            .filter(|fragment| !fragment.is_empty())
            .collect();

        if fragments.len() <= 12 {
            return fragments.join(". ");
        }
        let head = fragments[..8].join(". ");
        let tail = fragments[fragments.len() - 4..].join(". ");
        format!("{} … {}", head, tail)
    }

    /// Clamp to `max_chars` by keeping a head slice and a tail slice
    /// joined with an ellipsis marker.
    fn clamp_middle(text: &str, max_chars: usize) -> String {
        if text.chars().count() <= max_chars {
            return text.to_string();
        }
        let head_len = max_chars / 2;
        let tail_len = max_chars - head_len;
        format!(
            "{}\n…\n{}",
            truncate_chars(text, head_len),
            last_chars(text, tail_len)
        )
    }
}
