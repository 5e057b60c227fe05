//! Process lifecycle.
//!
//! # Design Decisions
//! - Shutdown is a broadcast: the server and any background task subscribe
//! - Ctrl+C and programmatic triggers (tests) go through the same channel

pub mod shutdown;

pub use shutdown::Shutdown;
