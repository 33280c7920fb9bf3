//! Request dispatcher: the single entry point for one invocation.
//!
//! # Data Flow
//! ```text
//! InboundRequest
//!     → OPTIONS?            → 200 preflight
//!     → upgrade: websocket? → 501
//!     → security::headers (outbound projection)
//!     → net::upstream (send, follow redirects, buffer)
//!     → rewrite (text content only, best effort)
//!     → response::assemble (strip framing, add CORS)
//!     → ProxyResponse
//! ```
//!
//! # Design Decisions
//! - Total over its input: every path ends in a well-formed `ProxyResponse`
//! - Generic over `Upstream` so failures can be simulated without a network

use std::sync::Arc;
use std::time::Instant;

use axum::http::Method;

use crate::config::ProxyConfig;
use crate::error::UpstreamError;
use crate::http::request::{InboundRequest, OutboundRequest};
use crate::http::response::ProxyResponse;
use crate::http::websocket;
use crate::net::Upstream;
use crate::observability::metrics;
use crate::rewrite::{self, RewriteContext};
use crate::security::HeaderPolicy;

/// Runs the relay pipeline for one request.
pub struct Dispatcher<U> {
    config: Arc<ProxyConfig>,
    upstream: U,
    policy: HeaderPolicy,
}

impl<U: Upstream> Dispatcher<U> {
    pub fn new(config: Arc<ProxyConfig>, upstream: U) -> Self {
        Self {
            config,
            upstream,
            policy: HeaderPolicy::default(),
        }
    }

    pub fn with_header_policy(mut self, policy: HeaderPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    /// Answer `request`. Never fails.
    pub async fn dispatch(&self, request: &InboundRequest) -> ProxyResponse {
        let start = Instant::now();
        let method = request.method.as_str();

        if request.method == Method::OPTIONS {
            metrics::record_short_circuit("preflight");
            metrics::record_request(method, 200, start);
            return ProxyResponse::preflight();
        }

        let target_base = self.config.target_base();
        let target_url = request.target_url(target_base);
        tracing::info!(
            method = %method,
            path = %request.path,
            query = %request.query.as_deref().unwrap_or("none"),
            target_base = %target_base,
            url = %target_url,
            "Relaying request"
        );

        if websocket::is_upgrade_request(&request.headers) {
            tracing::info!(url = %target_url, "Rejecting WebSocket upgrade");
            metrics::record_short_circuit("websocket");
            let response = websocket::rejection();
            metrics::record_request(method, response.status.as_u16(), start);
            return response;
        }

        let response = match self.forward(request, &target_url).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(url = %target_url, kind = e.kind(), error = %e, "Proxy error");
                metrics::record_upstream_error(e.kind());
                ProxyResponse::from_error(&e)
            }
        };

        metrics::record_request(method, response.status.as_u16(), start);
        response
    }

    async fn forward(
        &self,
        request: &InboundRequest,
        target_url: &str,
    ) -> Result<ProxyResponse, UpstreamError> {
        let outbound = OutboundRequest::build(request, target_url, &self.policy, &self.config)?;
        let upstream = self.upstream.send(outbound).await?;

        let content_type = upstream.content_type().to_string();
        let body = match RewriteContext::new(target_url, self.config.target_base()) {
            Ok(ctx) => rewrite::rewrite_body(&upstream.body, &content_type, &ctx),
            Err(e) => {
                tracing::warn!(url = %target_url, error = %e, "Skipping link rewrite");
                upstream.body.clone()
            }
        };

        tracing::info!(
            status = upstream.status.as_u16(),
            bytes = body.len(),
            content_type = %content_type,
            "Response relayed"
        );
        Ok(ProxyResponse::assemble(upstream, body))
    }
}
