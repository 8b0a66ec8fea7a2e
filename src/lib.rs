//! Local LLM Gateway Library
//!
//! An OpenAI/Ollama-compatible HTTP front end for an on-device
//! text-generation engine.
//!
//! # Architecture Overview
//!
//! ```text
//!                       ┌───────────────────────────────────────────────┐
//!                       │                  LLM GATEWAY                  │
//!                       │                                               │
//!   Client Request      │  ┌─────────┐   ┌─────────┐   ┌─────────────┐ │
//!   ────────────────────┼─▶│   net   │──▶│  http   │──▶│   routing   │ │
//!                       │  │listener │   │ framer  │   │  dispatch   │ │
//!                       │  └─────────┘   └─────────┘   └──────┬──────┘ │
//!                       │                                     │        │
//!                       │                                     ▼        │
//!                       │                             ┌─────────────┐  │
//!                       │                             │   context   │  │
//!                       │                             │   manager   │  │
//!                       │                             └──────┬──────┘  │
//!                       │                                    │         │
//!                       │              ┌─────────────┐       ▼         │
//!   Client Response     │  ┌────────┐  │   stream    │  ┌──────────┐   │
//!   ◀───────────────────┼──│response│◀─│  segments   │◀─│ provider │◀──┼── Text-generation
//!                       │  │  codec │  └─────────────┘  └──────────┘   │       engine
//!                       │  └────────┘                                  │
//!                       │                                              │
//!                       │  Cross-cutting: config, observability        │
//!                       └──────────────────────────────────────────────┘
//! ```

// Core subsystems
pub mod http;
pub mod net;
pub mod routing;

// Generation pipeline
pub mod api;
pub mod context;
pub mod provider;
pub mod stream;

// Cross-cutting concerns
pub mod config;
pub mod observability;

pub use config::GatewayConfig;
pub use net::{Server, ServerStatus};
pub use provider::{GenerationParams, ProviderError, TextGenerationProvider};
pub use routing::{GatewayState, Router};
