//! Host platform adapters.
//!
//! # Data Flow
//! ```text
//! platform event ──to_inbound──▶ InboundRequest ──Dispatcher──▶ ProxyResponse ──to_reply──▶ platform reply
//! ```
//!
//! # Design Decisions
//! - The pipeline only knows `InboundRequest` / `ProxyResponse`
//! - An event the adapter cannot read still produces a reply (502), never a fault

pub mod event;
pub mod local;

use thiserror::Error;

use crate::error::UpstreamError;
use crate::http::dispatcher::Dispatcher;
use crate::http::request::InboundRequest;
use crate::http::response::ProxyResponse;
use crate::net::Upstream;

/// Failure translating a platform event into an `InboundRequest`.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("invalid request method '{0}'")]
    InvalidMethod(String),

    #[error("malformed event: {0}")]
    MalformedEvent(String),
}

/// Translation between one platform's request/response shapes and the core model.
pub trait HostAdapter {
    type Event;
    type Reply;

    fn to_inbound(&self, event: Self::Event) -> Result<InboundRequest, HostError>;

    fn to_reply(&self, response: ProxyResponse) -> Self::Reply;
}

/// Run one invocation end to end through `adapter`.
pub async fn invoke<A, U>(adapter: &A, dispatcher: &Dispatcher<U>, event: A::Event) -> A::Reply
where
    A: HostAdapter,
    U: Upstream,
{
    let response = match adapter.to_inbound(event) {
        Ok(request) => dispatcher.dispatch(&request).await,
        Err(e) => {
            tracing::error!(error = %e, "Unreadable host event");
            ProxyResponse::from_error(&UpstreamError::other(e.to_string()))
        }
    };
    adapter.to_reply(response)
}
