//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request-id + trace layers, dispatch)
//!     → routing (parse path, resolve backend)
//!     → upstream.rs (build outbound request, execute once)
//!     → response.rs (stream upstream response to client)
//! ```

pub mod response;
pub mod server;
pub mod upstream;

pub use server::HttpServer;
pub use upstream::{HeaderPolicy, Relay};
