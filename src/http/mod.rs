//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! host adapter
//!     → request.rs (InboundRequest, outbound projection)
//!     → dispatcher.rs (preflight, websocket, forward, rewrite)
//!     → response.rs (strip framing, add CORS)
//!     → host adapter
//! ```
//!
//! `server.rs` is the local host: an Axum server that feeds the same
//! dispatcher through `host::local`.

pub mod dispatcher;
pub mod request;
pub mod response;
pub mod server;
pub mod websocket;

pub use dispatcher::Dispatcher;
pub use request::{InboundRequest, OutboundRequest};
pub use response::ProxyResponse;
pub use server::HttpServer;
