//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → shared by value/Arc with all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; `Server::set_port` is the only
//!   runtime reconfiguration and takes effect on the next start
//! - All fields have defaults to allow zero-config startup
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::load_config;
pub use schema::GatewayConfig;
pub use schema::ContextConfig;
pub use schema::ListenerConfig;
pub use schema::StreamerConfig;
