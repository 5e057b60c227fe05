//! Prefix-dispatch HTTP relay.
//!
//! Routes `/proxy/{name}/{remainder...}` to a named upstream API and relays
//! the request/response pair transparently, streaming bodies both ways.

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod routing;

pub use config::ProxyConfig;
pub use error::ProxyError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
