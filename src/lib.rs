//! Origin relay: a stateless reverse-proxy handler.
//!
//! One invocation forwards one inbound request to a configured origin,
//! rewrites links in textual responses so they point back at the origin,
//! and returns a CORS-enabled response descriptor to the host.

pub mod config;
pub mod error;
pub mod host;
pub mod http;
pub mod net;
pub mod observability;
pub mod resilience;
pub mod rewrite;
pub mod security;

pub use config::schema::ProxyConfig;
pub use error::UpstreamError;
pub use http::{Dispatcher, HttpServer, InboundRequest, ProxyResponse};
