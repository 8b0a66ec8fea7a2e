//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → listener.rs (accept loop, readiness reporting)
//!     → connection.rs (registry entry, read loop, framer)
//!     → routing dispatch, single response, close
//!
//! Connection lifetime:
//!     Accepted → AwaitingHeaders → AwaitingBody → Complete/Aborted → Closed
//! ```
//!
//! # Design Decisions
//! - Each connection is an independent task; the only shared mutable
//!   state is the registry used to cancel in-flight work on stop()
//! - No keep-alive: exactly one response per accepted connection
//! - Readiness is reported through a watch channel, never assumed

pub mod connection;
pub mod listener;

pub use connection::{ConnectionId, ConnectionRegistry};
pub use listener::{ListenerError, Server, ServerStatus};
