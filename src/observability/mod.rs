//! Observability subsystem.
//!
//! # Design Decisions
//! - Structured logging via `tracing`; every subsystem logs with fields,
//!   never bare strings
//! - Log level configurable via config file and `RUST_LOG`
//! - No metrics endpoint; the gateway is a single-user local service

pub mod logging;
