//! Per-connection handling and lifecycle tracking.
//!
//! # Responsibilities
//! - Generate unique connection IDs for tracing
//! - Track connection tasks so stop() can cancel in-flight work
//! - Drive one request/response cycle per connection

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::task::JoinHandle;

use crate::http::{HttpRequest, HttpResponse, RequestFramer};
use crate::routing::Router;

/// Read chunk size for the per-connection buffer.
const READ_CHUNK_BYTES: usize = 8192;

/// Global atomic counter for connection IDs.
/// Relaxed ordering is sufficient; only uniqueness matters.
static CONNECTION_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub fn new() -> Self {
        Self(CONNECTION_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Supervised set of live connection tasks.
///
/// The accept loop is the only writer adding entries; tasks remove
/// themselves on completion; stop() drains and aborts whatever is left.
/// A single mutex keeps the single-writer invariant trivially true.
#[derive(Clone, Default)]
pub struct ConnectionRegistry {
    inner: Arc<Mutex<HashMap<ConnectionId, JoinHandle<()>>>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a handler task for an accepted socket and track it.
    pub fn spawn(
        &self,
        stream: TcpStream,
        router: Arc<Router>,
        max_message_bytes: usize,
    ) -> ConnectionId {
        let id = ConnectionId::new();
        let registry = self.clone();
        let handle = tokio::spawn(async move {
            serve_connection(id, stream, router, max_message_bytes).await;
            registry.release(id);
        });

        let mut tracked = self.inner.lock().expect("registry lock poisoned");
        if !handle.is_finished() {
            tracked.insert(id, handle);
        }
        id
    }

    fn release(&self, id: ConnectionId) {
        self.inner.lock().expect("registry lock poisoned").remove(&id);
        tracing::trace!(connection_id = %id, "Connection closed");
    }

    /// Abort every tracked connection and clear the set.
    pub fn abort_all(&self) {
        let drained: Vec<(ConnectionId, JoinHandle<()>)> = {
            let mut tracked = self.inner.lock().expect("registry lock poisoned");
            tracked.drain().collect()
        };
        for (id, handle) in drained {
            handle.abort();
            tracing::debug!(connection_id = %id, "Connection cancelled");
        }
    }

    pub fn active_count(&self) -> usize {
        self.inner.lock().expect("registry lock poisoned").len()
    }
}

/// Drive one connection from accept to close: buffer bytes until a full
/// message frames, dispatch it, write exactly one response, close.
async fn serve_connection(
    id: ConnectionId,
    mut stream: TcpStream,
    router: Arc<Router>,
    max_message_bytes: usize,
) {
    let mut framer = RequestFramer::new(max_message_bytes);
    let mut chunk = [0u8; READ_CHUNK_BYTES];

    let framed: Option<HttpRequest> = loop {
        match stream.read(&mut chunk).await {
            Ok(0) => match framer.finish() {
                Ok(request) => break request,
                Err(e) => {
                    tracing::debug!(connection_id = %id, error = %e, "Incomplete request");
                    respond_and_close(id, &mut stream, HttpResponse::text(400, "Bad Request"))
                        .await;
                    return;
                }
            },
            Ok(n) => match framer.push(&chunk[..n]) {
                Ok(Some(request)) => break Some(request),
                Ok(None) => continue,
                Err(e) => {
                    tracing::debug!(connection_id = %id, error = %e, "Malformed request");
                    respond_and_close(id, &mut stream, HttpResponse::text(400, "Bad Request"))
                        .await;
                    return;
                }
            },
            Err(e) => {
                tracing::debug!(connection_id = %id, error = %e, "Transport error");
                return;
            }
        }
    };

    let Some(request) = framed else {
        // Peer closed without sending anything.
        return;
    };

    tracing::debug!(
        connection_id = %id,
        method = %request.method,
        path = %request.path,
        body_bytes = request.body.len(),
        "Request framed"
    );

    let response = router.dispatch(request).await;
    respond_and_close(id, &mut stream, response).await;
}

async fn respond_and_close(id: ConnectionId, stream: &mut TcpStream, response: HttpResponse) {
    if let Err(e) = stream.write_all(&response.serialize()).await {
        tracing::debug!(connection_id = %id, error = %e, "Failed to write response");
    }
    let _ = stream.shutdown().await;
}
