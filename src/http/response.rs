//! Response assembly.
//!
//! # Responsibilities
//! - Turn an upstream response plus the (possibly rewritten) body into the
//!   descriptor handed back to the host
//! - Strip framing headers that no longer describe the transmitted body
//! - Add CORS headers to everything, errors included
//!
//! # Design Decisions
//! - Status codes from the origin are never altered
//! - Every classified failure becomes a plain-text 502
//! - Proxied bodies are flagged for binary-safe (base64) transport

use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use bytes::Bytes;

use crate::error::UpstreamError;
use crate::net::UpstreamResponse;
use crate::security::cors;

/// Upstream headers that describe the origin's framing, not ours.
pub const STRIPPED_RESPONSE_HEADERS: &[&str] =
    &["content-encoding", "transfer-encoding", "content-length"];

/// What the relay answers for one invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct ProxyResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
    /// Host should transmit `body` base64-encoded.
    pub base64: bool,
}

impl ProxyResponse {
    /// Answer to a CORS preflight.
    pub fn preflight() -> Self {
        Self {
            status: StatusCode::OK,
            headers: cors::preflight_headers(),
            body: Bytes::new(),
            base64: false,
        }
    }

    /// Plain-text response carrying only the CORS origin header.
    pub fn plain_text(status: StatusCode, content_type: &'static str, body: String) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        cors::allow_origin(&mut headers);
        Self {
            status,
            headers,
            body: Bytes::from(body),
            base64: false,
        }
    }

    /// 502 for a classified upstream failure.
    pub fn from_error(err: &UpstreamError) -> Self {
        Self::plain_text(
            StatusCode::BAD_GATEWAY,
            "text/plain; charset=utf-8",
            err.to_string(),
        )
    }

    /// Combine the upstream status and headers with the final body.
    pub fn assemble(upstream: UpstreamResponse, body: Bytes) -> Self {
        let mut headers = upstream.headers;
        for name in STRIPPED_RESPONSE_HEADERS {
            headers.remove(*name);
        }
        cors::apply_response_headers(&mut headers);

        Self {
            status: upstream.status,
            headers,
            body,
            base64: true,
        }
    }

    /// Body as the host transmits it: base64 when flagged, text otherwise.
    pub fn encoded_body(&self) -> String {
        if self.base64 {
            BASE64.encode(&self.body)
        } else {
            String::from_utf8_lossy(&self.body).into_owned()
        }
    }
}
