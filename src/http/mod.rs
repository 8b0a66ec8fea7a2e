//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP byte chunks
//!     → request.rs (incremental framer: request line, headers, body)
//!     → [routing layer produces a response]
//!     → response.rs (deterministic serialization)
//!     → Send to client, close connection
//! ```
//!
//! # Design Decisions
//! - HTTP/1.1 only, one request per connection, no keep-alive
//! - Body length governed by Content-Length; when absent, the bytes
//!   buffered at end-of-stream become the body
//! - No chunked transfer encoding in either direction

pub mod request;
pub mod response;

pub use request::{FrameError, HttpRequest, RequestFramer};
pub use response::HttpResponse;
