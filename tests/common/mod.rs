//! Shared utilities for integration testing.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use llm_gateway::config::GatewayConfig;
use llm_gateway::provider::{GenerationParams, ProviderError, TextGenerationProvider};
use llm_gateway::routing::{GatewayState, Router};
use llm_gateway::Server;

/// One scripted provider outcome.
#[derive(Clone)]
pub enum StubReply {
    Reply(String),
    Unavailable,
    Fail(String),
}

/// Test provider: either a fixed reply for every call, or a finite
/// script consumed in order.
pub struct StubProvider {
    fixed: Option<String>,
    script: Mutex<VecDeque<StubReply>>,
}

impl StubProvider {
    pub fn fixed(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            fixed: Some(reply.to_string()),
            script: Mutex::new(VecDeque::new()),
        })
    }

    pub fn scripted(replies: Vec<StubReply>) -> Arc<Self> {
        Arc::new(Self {
            fixed: None,
            script: Mutex::new(replies.into()),
        })
    }

    pub fn unavailable() -> Arc<Self> {
        Self::scripted(vec![StubReply::Unavailable])
    }
}

#[async_trait]
impl TextGenerationProvider for StubProvider {
    async fn generate(
        &self,
        _prompt: &str,
        _params: GenerationParams,
    ) -> Result<String, ProviderError> {
        if let Some(reply) = &self.fixed {
            return Ok(reply.clone());
        }
        match self.script.lock().unwrap().pop_front() {
            Some(StubReply::Reply(text)) => Ok(text),
            Some(StubReply::Fail(reason)) => Err(ProviderError::Generation(reason)),
            Some(StubReply::Unavailable) | None => {
                Err(ProviderError::Unavailable("engine offline".to_string()))
            }
        }
    }
}

/// Provider whose calls never complete; for cancellation tests.
pub struct HangingProvider;

#[async_trait]
impl TextGenerationProvider for HangingProvider {
    async fn generate(
        &self,
        _prompt: &str,
        _params: GenerationParams,
    ) -> Result<String, ProviderError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Err(ProviderError::Generation("unreachable".to_string()))
    }
}

/// Start a gateway on a fixed loopback port with the given provider.
/// Panics if the port is taken; tests use unique ports.
pub async fn spawn_gateway(port: u16, provider: Arc<dyn TextGenerationProvider>) -> Server {
    let mut config = GatewayConfig::default();
    config.listener.port = port;

    let router = Arc::new(Router::new(GatewayState::new(provider, &config)));
    let mut server = Server::new(&config, router);
    server.start().expect("fresh server");
    server.wait_ready().await.expect("listener ready");
    server
}

/// Client with pooling disabled so every request is a fresh connection
/// (the gateway closes connections after one response).
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
