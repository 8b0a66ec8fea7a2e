//! Serialization wrapper for single-concurrency engines.
//!
//! Some engines can only service one generation at a time. Wrapping them
//! here keeps that constraint a provider capability instead of a
//! server-side lock; concurrent connections queue on the mutex while the
//! rest of the gateway stays fully concurrent.

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::provider::{GenerationParams, ProviderError, TextGenerationProvider};

pub struct Serialized<P> {
    inner: P,
    gate: Mutex<()>,
}

impl<P> Serialized<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            gate: Mutex::new(()),
        }
    }
}

#[async_trait]
impl<P: TextGenerationProvider> TextGenerationProvider for Serialized<P> {
    async fn generate(
        &self,
        prompt: &str,
        params: GenerationParams,
    ) -> Result<String, ProviderError> {
        let _guard = self.gate.lock().await;
        self.inner.generate(prompt, params).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;

    struct ConcurrencyProbe {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl TextGenerationProvider for Arc<ConcurrencyProbe> {
        async fn generate(
            &self,
            _prompt: &str,
            _params: GenerationParams,
        ) -> Result<String, ProviderError> {
            let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(current, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok("done".to_string())
        }
    }

    #[tokio::test]
    async fn serialized_provider_never_overlaps_calls() {
        let probe = Arc::new(ConcurrencyProbe {
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        });
        let provider = Arc::new(Serialized::new(Arc::clone(&probe)));

        let mut tasks = Vec::new();
        for _ in 0..4 {
            let provider = Arc::clone(&provider);
            tasks.push(tokio::spawn(async move {
                provider.generate("p", GenerationParams::default()).await
            }));
        }
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert_eq!(probe.peak.load(Ordering::SeqCst), 1);
    }
}
