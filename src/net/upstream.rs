//! Upstream requester.
//!
//! # Responsibilities
//! - Send one `OutboundRequest` to the origin
//! - Follow redirects up to the configured cap, under one overall deadline
//! - Buffer the full response body
//! - Translate transport errors into `UpstreamError`
//!
//! # Design Decisions
//! - A fresh client per invocation with no idle pool: the connection is
//!   released when the exchange ends, on every path
//! - The client decodes gzip/brotli/deflate, so buffered bytes are always
//!   the decoded representation
//! - Classification happens here and nowhere else

use std::error::Error as StdError;
use std::future::Future;
use std::io;

use axum::http::{header::CONTENT_TYPE, HeaderMap, StatusCode};
use bytes::Bytes;

use crate::error::UpstreamError;
use crate::http::request::OutboundRequest;

/// Buffered answer from the origin.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl UpstreamResponse {
    /// Declared content type, or `""` when missing or not valid text.
    pub fn content_type(&self) -> &str {
        self.headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
    }
}

/// Something that can carry a request to the origin.
pub trait Upstream {
    fn send(
        &self,
        request: OutboundRequest,
    ) -> impl Future<Output = Result<UpstreamResponse, UpstreamError>> + Send;
}

/// Real HTTP(S) upstream backed by `reqwest`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpUpstream;

impl Upstream for HttpUpstream {
    async fn send(&self, request: OutboundRequest) -> Result<UpstreamResponse, UpstreamError> {
        let url = request.target;

        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(request.max_redirects))
            .timeout(request.timeout)
            .pool_max_idle_per_host(0)
            .build()
            .map_err(|e| UpstreamError::other(e.to_string()))?;

        let mut builder = client
            .request(request.method, request.url)
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| classify(&e, &url))?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(|e| classify(&e, &url))?;

        tracing::debug!(url = %url, status = %status, bytes = body.len(), "Upstream responded");
        Ok(UpstreamResponse {
            status,
            headers,
            body,
        })
    }
}

/// Map a transport error onto the relay's error taxonomy.
pub fn classify(err: &reqwest::Error, url: &str) -> UpstreamError {
    if err.is_timeout() || err.is_redirect() {
        return UpstreamError::Timeout {
            url: url.to_string(),
        };
    }

    let mut source = err.source();
    while let Some(cause) = source {
        if let Some(io_err) = cause.downcast_ref::<io::Error>() {
            match io_err.kind() {
                io::ErrorKind::ConnectionRefused => {
                    return UpstreamError::ConnectionRefused {
                        url: url.to_string(),
                    }
                }
                io::ErrorKind::TimedOut => {
                    return UpstreamError::Timeout {
                        url: url.to_string(),
                    }
                }
                _ => {}
            }
        }
        if is_dns_failure(&cause.to_string()) {
            return UpstreamError::NotFound {
                url: url.to_string(),
            };
        }
        source = cause.source();
    }

    UpstreamError::other(err.to_string())
}

/// Resolver messages across hyper-util, glibc, macOS and Windows.
fn is_dns_failure(message: &str) -> bool {
    const MARKERS: &[&str] = &[
        "dns error",
        "failed to lookup address",
        "name or service not known",
        "nodename nor servname",
        "no such host",
        "temporary failure in name resolution",
    ];
    let message = message.to_ascii_lowercase();
    MARKERS.iter().any(|m| message.contains(m))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_content_type() {
        let mut headers = HeaderMap::new();
        let mut response = UpstreamResponse {
            status: StatusCode::OK,
            headers: headers.clone(),
            body: Bytes::new(),
        };
        assert_eq!(response.content_type(), "");

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/html; charset=utf-8"));
        response.headers = headers;
        assert_eq!(response.content_type(), "text/html; charset=utf-8");
    }

    #[test]
    fn test_dns_markers() {
        assert!(is_dns_failure(
            "dns error: failed to lookup address information: Name or service not known"
        ));
        assert!(is_dns_failure("No such host is known. (os error 11001)"));
        assert!(!is_dns_failure("connection reset by peer"));
    }

    #[tokio::test]
    async fn test_connection_refused_classified() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let url = format!("http://{}/", addr);
        let err = reqwest::Client::new().get(&url).send().await.unwrap_err();
        assert_eq!(
            classify(&err, &url),
            UpstreamError::ConnectionRefused { url }
        );
    }
}
