//! Request data model and outbound projection.
//!
//! # Responsibilities
//! - Hold the host-agnostic view of one inbound request
//! - Build the absolute target URL on the origin
//! - Project the inbound request onto the request actually sent upstream
//!
//! # Design Decisions
//! - `InboundRequest` is never mutated; `OutboundRequest` owns fresh copies
//! - Bodies are never synthesized: absent stays absent
//! - Base64 bodies are decoded here, before anything reaches the network

use std::time::Duration;

use axum::http::{HeaderMap, HeaderName, HeaderValue, Method};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use bytes::Bytes;
use url::Url;

use crate::config::ProxyConfig;
use crate::error::UpstreamError;
use crate::resilience::timeouts::effective_timeout;
use crate::security::HeaderPolicy;

/// One request as delivered by the host platform.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    /// Raw body; base64 text when `is_base64_encoded` is set.
    pub body: Option<Bytes>,
    pub is_base64_encoded: bool,
}

impl InboundRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: None,
            headers: HeaderMap::new(),
            body: None,
            is_base64_encoded: false,
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Append a header. Invalid names or values are ignored.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            self.headers.append(name, value);
        }
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_base64_body(mut self, encoded: impl Into<Bytes>) -> Self {
        self.body = Some(encoded.into());
        self.is_base64_encoded = true;
        self
    }

    /// `{base}{path}[?{query}]`, with an empty path treated as `/`.
    pub fn target_url(&self, target_base: &str) -> String {
        let path = if self.path.is_empty() { "/" } else { self.path.as_str() };
        match self.query.as_deref().filter(|q| !q.is_empty()) {
            Some(query) => format!("{}{}?{}", target_base, path, query),
            None => format!("{}{}", target_base, path),
        }
    }

    /// Body bytes to transmit, or `None` when no body must be sent.
    pub fn outbound_body(&self) -> Result<Option<Bytes>, UpstreamError> {
        if !method_allows_body(&self.method) {
            return Ok(None);
        }
        let raw = match &self.body {
            Some(raw) if !raw.is_empty() => raw,
            _ => return Ok(None),
        };
        if !self.is_base64_encoded {
            return Ok(Some(raw.clone()));
        }
        BASE64
            .decode(raw)
            .map(|decoded| Some(Bytes::from(decoded)))
            .map_err(|e| UpstreamError::other(format!("invalid base64 request body: {}", e)))
    }
}

/// GET, HEAD and OPTIONS never carry a body upstream.
pub fn method_allows_body(method: &Method) -> bool {
    !matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

/// The request handed to the upstream client.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub method: Method,
    /// Target URL exactly as constructed; error bodies quote this form.
    pub target: String,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
    pub timeout: Duration,
    pub max_redirects: usize,
}

impl OutboundRequest {
    /// Project `inbound` onto a request for `target_url`.
    pub fn build(
        inbound: &InboundRequest,
        target_url: &str,
        policy: &HeaderPolicy,
        config: &ProxyConfig,
    ) -> Result<Self, UpstreamError> {
        let url = Url::parse(target_url)
            .map_err(|e| UpstreamError::other(format!("invalid target URL {}: {}", target_url, e)))?;

        Ok(Self {
            method: inbound.method.clone(),
            target: target_url.to_string(),
            url,
            headers: policy.filter(&inbound.headers, config.target_base()),
            body: inbound.outbound_body()?,
            timeout: effective_timeout(&config.timeouts),
            max_redirects: config.upstream.max_redirects,
        })
    }
}
