//! TCP listener with supervised connection lifecycle.
//!
//! # Responsibilities
//! - Bind the configured port and run the accept loop
//! - Report readiness asynchronously (ready/failed/stopped)
//! - Track accepted connections so stop() cancels in-flight work
//! - Support port reconfiguration between runs

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::config::GatewayConfig;
use crate::net::connection::ConnectionRegistry;
use crate::routing::Router;

/// Error type for listener operations.
#[derive(Debug)]
pub enum ListenerError {
    /// Failed to bind to the configured address.
    Bind(String),
    /// start() called while an accept loop is already running.
    AlreadyRunning,
}

impl std::fmt::Display for ListenerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListenerError::Bind(reason) => write!(f, "Failed to bind: {}", reason),
            ListenerError::AlreadyRunning => write!(f, "Listener already running"),
        }
    }
}

impl std::error::Error for ListenerError {}

/// Observable listener state. `start()` returning does not imply the
/// port is listening; watch this instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerStatus {
    /// Not started, or a start is in flight.
    Idle,
    /// Accept loop is running on this address.
    Ready(SocketAddr),
    /// Bind failed; the listener remains stopped.
    Failed(String),
    /// stop() completed.
    Stopped,
}

/// The gateway's HTTP server: accept loop plus connection supervision.
pub struct Server {
    bind_host: String,
    port: u16,
    max_message_bytes: usize,
    router: Arc<Router>,
    registry: ConnectionRegistry,
    status_tx: watch::Sender<ServerStatus>,
    status_rx: watch::Receiver<ServerStatus>,
    accept_task: Option<JoinHandle<()>>,
}

impl Server {
    pub fn new(config: &GatewayConfig, router: Arc<Router>) -> Self {
        let (status_tx, status_rx) = watch::channel(ServerStatus::Idle);
        Self {
            bind_host: config.listener.bind_host.clone(),
            port: config.listener.port,
            max_message_bytes: config.listener.max_message_bytes,
            router,
            registry: ConnectionRegistry::new(),
            status_tx,
            status_rx,
            accept_task: None,
        }
    }

    /// Reconfigure the port. Takes effect on the next start().
    pub fn set_port(&mut self, port: u16) {
        self.port = port;
    }

    /// Subscribe to listener status changes.
    pub fn status(&self) -> watch::Receiver<ServerStatus> {
        self.status_rx.clone()
    }

    /// Number of currently tracked connections.
    pub fn active_connections(&self) -> usize {
        self.registry.active_count()
    }

    /// Spawn the accept loop. Readiness (or bind failure) is reported
    /// through the status watch, not by this call.
    pub fn start(&mut self) -> Result<(), ListenerError> {
        if let Some(task) = &self.accept_task {
            if !task.is_finished() {
                return Err(ListenerError::AlreadyRunning);
            }
        }

        self.status_tx.send_replace(ServerStatus::Idle);

        let addr = format!("{}:{}", self.bind_host, self.port);
        let router = Arc::clone(&self.router);
        let registry = self.registry.clone();
        let status = self.status_tx.clone();
        let max_message_bytes = self.max_message_bytes;

        self.accept_task = Some(tokio::spawn(async move {
            let listener = match TcpListener::bind(&addr).await {
                Ok(listener) => listener,
                Err(e) => {
                    tracing::error!(address = %addr, error = %e, "Bind failed");
                    status.send_replace(ServerStatus::Failed(e.to_string()));
                    return;
                }
            };

            match listener.local_addr() {
                Ok(local) => {
                    tracing::info!(address = %local, "Listener bound");
                    status.send_replace(ServerStatus::Ready(local));
                }
                Err(e) => {
                    status.send_replace(ServerStatus::Failed(e.to_string()));
                    return;
                }
            }

            loop {
                match listener.accept().await {
                    Ok((stream, peer)) => {
                        let id =
                            registry.spawn(stream, Arc::clone(&router), max_message_bytes);
                        tracing::debug!(peer_addr = %peer, connection_id = %id, "Connection accepted");
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Accept failed");
                    }
                }
            }
        }));

        Ok(())
    }

    /// Wait until the pending start resolves. Convenience over status().
    pub async fn wait_ready(&self) -> Result<SocketAddr, ListenerError> {
        let mut status = self.status_rx.clone();
        loop {
            match status.borrow_and_update().clone() {
                ServerStatus::Ready(addr) => return Ok(addr),
                ServerStatus::Failed(reason) => return Err(ListenerError::Bind(reason)),
                ServerStatus::Idle | ServerStatus::Stopped => {}
            }
            if status.changed().await.is_err() {
                return Err(ListenerError::Bind("listener dropped".to_string()));
            }
        }
    }

    /// Cancel the accept loop and every tracked connection, then clear
    /// the tracked set. Idempotent.
    pub async fn stop(&mut self) {
        if let Some(task) = self.accept_task.take() {
            task.abort();
            let _ = task.await;
        }
        self.registry.abort_all();
        self.status_tx.send_replace(ServerStatus::Stopped);
        tracing::info!("Listener stopped");
    }
}
