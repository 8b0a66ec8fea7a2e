//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Framed HttpRequest (method, path, body)
//!     → router.rs (priority-ordered dispatch)
//!     → handlers.rs (decode body, run pipeline, encode response)
//!     → HttpResponse back to the connection handler
//! ```
//!
//! # Design Decisions
//! - Router is immutable after construction and shared via Arc
//! - OPTIONS is answered before any route matching (CORS preflight)
//! - Unmatched routes return plain-text 404; matched routes speak JSON

pub mod handlers;
pub mod router;

pub use handlers::GatewayState;
pub use router::Router;
