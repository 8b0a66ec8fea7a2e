//! Incremental HTTP/1.1 request framing.
//!
//! # Responsibilities
//! - Accumulate bytes until a full message is assembled
//! - Parse the request line (`METHOD SP PATH SP VERSION`)
//! - Parse the header block; honor `Content-Length`
//! - Enforce the configured message size cap
//!
//! # Design Decisions
//! - Push-based state machine so a connection task can feed it chunk by
//!   chunk without blocking reads
//! - Header keys are stored byte-for-byte as received; lookup is
//!   ASCII-case-insensitive
//! - Without `Content-Length`, whatever trails the completed header
//!   block is the body; chunked encoding is not supported

use std::fmt;

/// A fully framed HTTP request. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: String,
    pub path: String,
    /// Headers in wire order, keys preserved exactly as received.
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpRequest {
    /// Look up a header value, matching the name case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Declared body length, when present and well-formed.
    pub fn content_length(&self) -> Option<usize> {
        self.header("Content-Length")?.trim().parse().ok()
    }
}

/// Framer progress. `Complete` and `Aborted` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramerState {
    AwaitingHeaders,
    AwaitingBody,
    Complete,
    Aborted,
}

/// Error type for framing failures. All of these map to `400 Bad Request`.
#[derive(Debug)]
pub enum FrameError {
    /// Request line had fewer than two space-delimited tokens.
    MalformedRequestLine,
    /// Accumulated message exceeded the configured cap.
    MessageTooLarge(usize),
    /// Stream ended before the full declared body arrived.
    UnexpectedEof,
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::MalformedRequestLine => write!(f, "Malformed request line"),
            FrameError::MessageTooLarge(cap) => {
                write!(f, "Message exceeds {} byte limit", cap)
            }
            FrameError::UnexpectedEof => write!(f, "Stream ended mid-message"),
        }
    }
}

impl std::error::Error for FrameError {}

/// Parsed request line and header block, pending body completion.
#[derive(Debug)]
struct Head {
    method: String,
    path: String,
    headers: Vec<(String, String)>,
    /// Offset of the first body byte in the accumulated buffer.
    body_start: usize,
    content_length: Option<usize>,
}

/// Incremental request framer owned by exactly one connection.
#[derive(Debug)]
pub struct RequestFramer {
    buf: Vec<u8>,
    state: FramerState,
    head: Option<Head>,
    max_message_bytes: usize,
}

impl RequestFramer {
    pub fn new(max_message_bytes: usize) -> Self {
        Self {
            buf: Vec::new(),
            state: FramerState::AwaitingHeaders,
            head: None,
            max_message_bytes,
        }
    }

    pub fn state(&self) -> FramerState {
        self.state
    }

    /// Feed a chunk of bytes. Returns a request once the message is
    /// complete, `None` while more bytes are needed.
    pub fn push(&mut self, chunk: &[u8]) -> Result<Option<HttpRequest>, FrameError> {
        if matches!(self.state, FramerState::Complete | FramerState::Aborted) {
            return Ok(None);
        }

        self.buf.extend_from_slice(chunk);
        if self.buf.len() > self.max_message_bytes {
            self.state = FramerState::Aborted;
            return Err(FrameError::MessageTooLarge(self.max_message_bytes));
        }

        if self.state == FramerState::AwaitingHeaders {
            let Some(header_end) = find_header_terminator(&self.buf) else {
                return Ok(None);
            };
            let head = match parse_head(&self.buf[..header_end], header_end + 4) {
                Ok(head) => head,
                Err(e) => {
                    self.state = FramerState::Aborted;
                    return Err(e);
                }
            };
            self.head = Some(head);
            self.state = FramerState::AwaitingBody;
        }

        self.try_complete_body()
    }

    /// Signal end-of-stream. Flags truncated messages.
    pub fn finish(&mut self) -> Result<Option<HttpRequest>, FrameError> {
        match self.state {
            FramerState::Complete | FramerState::Aborted => Ok(None),
            FramerState::AwaitingHeaders => {
                if self.buf.is_empty() {
                    // Peer connected and left without sending anything.
                    self.state = FramerState::Aborted;
                    Ok(None)
                } else {
                    self.state = FramerState::Aborted;
                    Err(FrameError::UnexpectedEof)
                }
            }
            FramerState::AwaitingBody => {
                // Only a declared-but-short body leaves the framer parked
                // here; without Content-Length the message completed the
                // moment its header block did.
                self.state = FramerState::Aborted;
                Err(FrameError::UnexpectedEof)
            }
        }
    }

    fn try_complete_body(&mut self) -> Result<Option<HttpRequest>, FrameError> {
        let Some(head) = self.head.as_ref() else {
            return Ok(None);
        };

        let body_end = match head.content_length {
            Some(length) => {
                if self.buf.len() < head.body_start + length {
                    return Ok(None);
                }
                head.body_start + length
            }
            // No declared length: whatever trailed the header block is
            // the body. Keep-alive peers that send more later are out of
            // contract; a bodyless GET frames here immediately.
            None => self.buf.len(),
        };

        let head = self.head.take().expect("checked above");
        let body = self.buf[head.body_start..body_end].to_vec();
        self.state = FramerState::Complete;
        Ok(Some(HttpRequest {
            method: head.method,
            path: head.path,
            headers: head.headers,
            body,
        }))
    }
}

/// Locate the blank line terminating the header block. Returns the offset
/// of the `\r\n\r\n` sequence.
fn find_header_terminator(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

fn parse_head(head_bytes: &[u8], body_start: usize) -> Result<Head, FrameError> {
    let text = String::from_utf8_lossy(head_bytes);
    let mut lines = text.split("\r\n");

    let request_line = lines.next().unwrap_or("");
    let mut tokens = request_line.split_whitespace();
    let (Some(method), Some(path)) = (tokens.next(), tokens.next()) else {
        return Err(FrameError::MalformedRequestLine);
    };

    let mut headers = Vec::new();
    for line in lines {
        if line.is_empty() {
            continue;
        }
        // Lines without a colon are ignored rather than fatal.
        if let Some((key, value)) = line.split_once(':') {
            headers.push((key.to_string(), value.trim().to_string()));
        }
    }

    let content_length = headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case("Content-Length"))
        .and_then(|(_, value)| value.parse().ok());

    Ok(Head {
        method: method.to_string(),
        path: path.to_string(),
        headers,
        body_start,
        content_length,
    })
}
