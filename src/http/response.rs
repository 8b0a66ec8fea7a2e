//! HTTP response construction and serialization.
//!
//! # Design Decisions
//! - Deterministic wire format: status line, computed Content-Length,
//!   remaining headers in insertion order, blank line, body
//! - Every response closes the connection; `Connection: close` is always
//!   emitted

use crate::api;

/// An HTTP response ready for serialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Plain-text response.
    pub fn text(status: u16, body: &str) -> Self {
        Self::new(status)
            .with_header("Content-Type", "text/plain; charset=utf-8")
            .with_body(body.as_bytes().to_vec())
    }

    /// JSON response carrying the CORS origin header, as every matched
    /// route's JSON output does.
    pub fn json(status: u16, body: &impl serde::Serialize) -> Self {
        let bytes = serde_json::to_vec(body).unwrap_or_else(|e| {
            tracing::error!(error = %e, "Response serialization failed");
            b"{}".to_vec()
        });
        Self::new(status)
            .with_header("Content-Type", "application/json")
            .with_header("Access-Control-Allow-Origin", "*")
            .with_body(bytes)
    }

    /// JSON error envelope: `{"error": {"message": ...}}`.
    pub fn json_error(status: u16, message: impl Into<String>) -> Self {
        Self::json(status, &api::ErrorEnvelope::new(message))
    }

    /// CORS preflight response.
    pub fn preflight() -> Self {
        Self::new(204)
            .with_header("Access-Control-Allow-Origin", "*")
            .with_header("Access-Control-Allow-Methods", "POST, OPTIONS")
            .with_header("Access-Control-Allow-Headers", "Content-Type, Authorization")
            .with_header("Access-Control-Max-Age", "600")
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.push((key.to_string(), value.to_string()));
        self
    }

    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Serialize to wire bytes.
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.body.len() + 256);
        out.extend_from_slice(
            format!(
                "HTTP/1.1 {} {}\r\nContent-Length: {}\r\n",
                self.status,
                reason_phrase(self.status),
                self.body.len()
            )
            .as_bytes(),
        );
        for (key, value) in &self.headers {
            out.extend_from_slice(format!("{}: {}\r\n", key, value).as_bytes());
        }
        out.extend_from_slice(b"Connection: close\r\n\r\n");
        out.extend_from_slice(&self.body);
        out
    }
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        204 => "No Content",
        400 => "Bad Request",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}
