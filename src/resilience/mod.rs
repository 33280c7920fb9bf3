//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to origin:
//!     → timeouts.rs (one deadline for the whole exchange, redirects included)
//!     → redirect cap enforced by the upstream client
//! ```
//!
//! # Design Decisions
//! - Every upstream call has a deadline
//! - No retries: a request is forwarded exactly once per invocation

pub mod timeouts;
