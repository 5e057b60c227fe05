//! Configuration subsystem.
//!
//! # Data Flow
//! ```text
//! TOML file (optional, --config)
//!     → loader.rs (read, parse)
//!     → validation.rs (semantic checks, all errors reported)
//!     → schema.rs types (frozen ProxyConfig)
//! ```
//!
//! # Design Decisions
//! - Defaults are usable without any file (openai/claude table built in)
//! - Configuration is loaded once at startup; no hot reload
//! - Validation is a pure function and reports every error, not just the first

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{BackendConfig, HeaderConfig, ListenerConfig, ProxyConfig, TimeoutConfig};
