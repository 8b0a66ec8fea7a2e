//! Text-generation provider boundary.
//!
//! The gateway treats the generation engine as an opaque capability: a
//! prompt goes in, text comes out, and failures are either "the engine is
//! not there" or "the engine broke". Everything upstream of this trait is
//! engine-agnostic.

pub mod serial;
pub mod upstream;

use async_trait::async_trait;
use thiserror::Error;

/// Per-call generation knobs. Both are optional; the engine applies its
/// own defaults when absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenerationParams {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

/// Errors a generation call can produce.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The engine cannot be reached at all.
    #[error("text generation provider unavailable: {0}")]
    Unavailable(String),

    /// The engine was reached but generation failed.
    #[error("text generation failed: {0}")]
    Generation(String),
}

/// The text-generation capability this gateway fronts.
#[async_trait]
pub trait TextGenerationProvider: Send + Sync {
    /// Generate a completion for `prompt`. May take arbitrary wall-clock
    /// time; callers await without holding locks.
    async fn generate(
        &self,
        prompt: &str,
        params: GenerationParams,
    ) -> Result<String, ProviderError>;
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Scriptable providers shared by unit tests across modules.

    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;

    /// Echoes a marker plus the prompt length; useful where tests only
    /// need deterministic non-empty output.
    pub struct EchoProvider;

    #[async_trait]
    impl TextGenerationProvider for EchoProvider {
        async fn generate(
            &self,
            prompt: &str,
            _params: GenerationParams,
        ) -> Result<String, ProviderError> {
            Ok(format!("echo({})", prompt.len()))
        }
    }

    /// Always unavailable.
    pub struct UnavailableProvider;

    #[async_trait]
    impl TextGenerationProvider for UnavailableProvider {
        async fn generate(
            &self,
            _prompt: &str,
            _params: GenerationParams,
        ) -> Result<String, ProviderError> {
            Err(ProviderError::Unavailable("engine offline".to_string()))
        }
    }

    /// Returns queued responses in order, recording each prompt. Runs dry
    /// into a `Generation` error.
    pub struct ScriptedProvider {
        replies: Mutex<VecDeque<Result<String, ProviderError>>>,
        pub prompts: Mutex<Vec<String>>,
    }

    impl ScriptedProvider {
        pub fn new(replies: Vec<Result<String, ProviderError>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl TextGenerationProvider for ScriptedProvider {
        async fn generate(
            &self,
            prompt: &str,
            _params: GenerationParams,
        ) -> Result<String, ProviderError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(ProviderError::Generation("script exhausted".to_string())))
        }
    }
}
