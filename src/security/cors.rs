//! Permissive CORS headers.
//!
//! Every response leaving the relay, including errors and short-circuits,
//! carries at least `Access-Control-Allow-Origin: *` so browser clients can
//! read it.

use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    ACCESS_CONTROL_EXPOSE_HEADERS, ACCESS_CONTROL_MAX_AGE,
};
use axum::http::{HeaderMap, HeaderValue};

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS, HEAD, PATCH";
pub const ALLOW_HEADERS: &str = "*";
pub const EXPOSE_HEADERS: &str = "*";
/// Preflight cache lifetime (one day).
pub const MAX_AGE_SECS: &str = "86400";

/// Only the origin header; used on error and rejection responses.
pub fn allow_origin(headers: &mut HeaderMap) {
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static(ALLOW_ORIGIN));
}

/// The four headers answered to an OPTIONS preflight.
pub fn preflight_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    allow_origin(&mut headers);
    headers.insert(ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(ALLOW_METHODS));
    headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static(ALLOW_HEADERS));
    headers.insert(ACCESS_CONTROL_MAX_AGE, HeaderValue::from_static(MAX_AGE_SECS));
    headers
}

/// Headers injected into every proxied response, replacing upstream values.
pub fn apply_response_headers(headers: &mut HeaderMap) {
    allow_origin(headers);
    headers.insert(ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(ALLOW_METHODS));
    headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static(ALLOW_HEADERS));
    headers.insert(ACCESS_CONTROL_EXPOSE_HEADERS, HeaderValue::from_static(EXPOSE_HEADERS));
}
