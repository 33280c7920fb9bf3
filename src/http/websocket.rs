//! WebSocket upgrade detection.
//!
//! Tunneling is not supported: one invocation answers one request and holds
//! no connection open, so upgrade requests get a fixed 501 instead of being
//! forwarded.

use axum::http::{header::UPGRADE, HeaderMap, StatusCode};

use crate::http::response::ProxyResponse;

pub const WEBSOCKET_UNSUPPORTED: &str = "WebSocket connections are not supported by this proxy. Consider using Server-Sent Events or polling instead.";

/// True when any `upgrade` header value is `websocket`, ignoring case.
pub fn is_upgrade_request(headers: &HeaderMap) -> bool {
    headers.get_all(UPGRADE).iter().any(|value| {
        value
            .to_str()
            .map(|v| v.trim().eq_ignore_ascii_case("websocket"))
            .unwrap_or(false)
    })
}

pub fn rejection() -> ProxyResponse {
    ProxyResponse::plain_text(
        StatusCode::NOT_IMPLEMENTED,
        "text/plain",
        WEBSOCKET_UNSUPPORTED.to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderName, HeaderValue};

    #[test]
    fn test_detects_any_casing() {
        for (name, value) in [
            ("upgrade", "websocket"),
            ("Upgrade", "WebSocket"),
            ("UPGRADE", "WEBSOCKET"),
        ] {
            let mut headers = HeaderMap::new();
            headers.insert(
                HeaderName::from_bytes(name.as_bytes()).unwrap(),
                HeaderValue::from_static(value),
            );
            assert!(is_upgrade_request(&headers), "{name}: {value}");
        }
    }

    #[test]
    fn test_other_upgrades_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(UPGRADE, HeaderValue::from_static("h2c"));
        assert!(!is_upgrade_request(&headers));
        assert!(!is_upgrade_request(&HeaderMap::new()));
    }

    #[test]
    fn test_rejection() {
        let response = rejection();
        assert_eq!(response.status, StatusCode::NOT_IMPLEMENTED);
        assert_eq!(response.headers["access-control-allow-origin"], "*");
        assert_eq!(response.body, WEBSOCKET_UNSUPPORTED.as_bytes());
    }
}
