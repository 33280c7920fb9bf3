//! Adapter for the local axum host.
//!
//! The request body is buffered by the server before it gets here; the
//! reply carries raw bytes, so the base64 flag only matters to hosts that
//! transport text.

use axum::body::Body;
use axum::http::request::Parts;
use axum::response::Response;
use bytes::Bytes;

use crate::host::{HostAdapter, HostError};
use crate::http::request::InboundRequest;
use crate::http::response::ProxyResponse;

/// Hop-by-hop headers the local server manages itself.
const HOP_BY_HOP: &[&str] = &["connection", "keep-alive"];

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalAdapter;

impl HostAdapter for LocalAdapter {
    type Event = (Parts, Bytes);
    type Reply = Response;

    fn to_inbound(&self, (parts, body): (Parts, Bytes)) -> Result<InboundRequest, HostError> {
        Ok(InboundRequest {
            method: parts.method,
            path: parts.uri.path().to_string(),
            query: parts.uri.query().filter(|q| !q.is_empty()).map(str::to_string),
            headers: parts.headers,
            body: (!body.is_empty()).then_some(body),
            is_base64_encoded: false,
        })
    }

    fn to_reply(&self, response: ProxyResponse) -> Response {
        let mut headers = response.headers;
        for name in HOP_BY_HOP {
            headers.remove(*name);
        }

        let mut reply = Response::new(Body::from(response.body));
        *reply.status_mut() = response.status;
        *reply.headers_mut() = headers;
        reply
    }
}
