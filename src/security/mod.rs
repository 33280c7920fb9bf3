//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → headers.rs (drop edge/tracing headers, add defaults, pin referer)
//!     → forwarded to origin
//!
//! Outgoing response:
//!     → cors.rs (permissive CORS on every response, errors included)
//! ```
//!
//! # Design Decisions
//! - No trust in provenance headers supplied by the edge
//! - Header tables are constants, never mutated at runtime

pub mod cors;
pub mod headers;

pub use headers::HeaderPolicy;
