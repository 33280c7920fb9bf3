//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! OutboundRequest
//!     → upstream.rs (reqwest client, redirects, deadline)
//!     → origin
//!     → UpstreamResponse | UpstreamError (classified)
//! ```
//!
//! # Design Decisions
//! - The `Upstream` trait is the seam between the pipeline and the network
//! - No connection reuse across invocations

pub mod upstream;

pub use upstream::{HttpUpstream, Upstream, UpstreamResponse};
