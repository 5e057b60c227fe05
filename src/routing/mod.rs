//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming path "/proxy/{name}/{remainder...}"
//!     → router.rs (parse into TargetDescriptor)
//!     → registry.rs (resolve backend name → base URL)
//!     → Return: resolved backend + remainder, or a 400-class error
//! ```
//!
//! # Design Decisions
//! - Registry compiled at startup, immutable at runtime (lock-free lookup)
//! - No regex: a fixed three-way split on the first two slash boundaries
//! - The remainder is captured as one opaque string, never re-split

pub mod registry;
pub mod router;

pub use registry::{Backend, BackendRegistry};
pub use router::{parse_target, TargetDescriptor};
