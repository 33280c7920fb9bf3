//! Request header filtering.
//!
//! # Responsibilities
//! - Drop provenance headers added by the hosting edge (forwarding chains,
//!   platform ids, tracing spans) before the request reaches the origin
//! - Supply browser-like defaults for `user-agent` and `accept`
//! - Pin `referer` to the origin so it sees a same-site referrer
//! - Narrow `accept-encoding` to codings the upstream client can decode
//!
//! # Design Decisions
//! - Exclusion is whole-name and case-insensitive, never prefix based
//! - Tables are immutable constants handed to the filter through `HeaderPolicy`
//! - The output is a fresh map; the inbound headers are never mutated

use axum::http::header::{ACCEPT, ACCEPT_ENCODING, REFERER, USER_AGENT};
use axum::http::{HeaderMap, HeaderName, HeaderValue};

/// Headers never forwarded to the origin.
pub const EXCLUDED_REQUEST_HEADERS: &[&str] = &[
    "host",
    "x-forwarded-for",
    "x-forwarded-proto",
    "x-forwarded-port",
    "x-forwarded-host",
    "forwarded",
    "x-real-ip",
    // Netlify edge
    "x-nf-request-id",
    "x-nf-client-connection-ip",
    "x-netlify-id",
    "x-netlify-stage",
    "x-bb-ab",
    "x-bb-client-request-uuid",
    "x-bb-loop",
    // CDN client identification
    "cf-connecting-ip",
    "cf-ipcountry",
    "cf-ray",
    "cf-visitor",
    "true-client-ip",
    "fastly-client-ip",
    // Tracing
    "x-request-id",
    "x-amzn-trace-id",
    "x-datadog-trace-id",
    "x-datadog-parent-id",
    "x-datadog-sampling-priority",
    "x-datadog-origin",
    "x-b3-traceid",
    "x-b3-spanid",
    "x-b3-parentspanid",
    "x-b3-sampled",
    "traceparent",
    "tracestate",
];

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

pub const DEFAULT_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,image/apng,*/*;q=0.8";

/// Content codings the upstream client decodes before the body is relayed.
pub const DECODABLE_CODINGS: &[&str] = &["gzip", "br", "deflate", "identity"];

/// Rules for projecting inbound headers onto the outbound request.
#[derive(Debug, Clone, Copy)]
pub struct HeaderPolicy {
    pub excluded: &'static [&'static str],
    pub default_user_agent: &'static str,
    pub default_accept: &'static str,
}

impl Default for HeaderPolicy {
    fn default() -> Self {
        Self {
            excluded: EXCLUDED_REQUEST_HEADERS,
            default_user_agent: DEFAULT_USER_AGENT,
            default_accept: DEFAULT_ACCEPT,
        }
    }
}

impl HeaderPolicy {
    pub fn is_excluded(&self, name: &str) -> bool {
        self.excluded.iter().any(|h| name.eq_ignore_ascii_case(h))
    }

    /// Build the outbound header map for a request to `target_base`.
    pub fn filter(&self, inbound: &HeaderMap, target_base: &str) -> HeaderMap {
        let mut outbound = HeaderMap::with_capacity(inbound.len() + 3);

        for (name, value) in inbound {
            if !self.is_excluded(name.as_str()) {
                outbound.append(name.clone(), value.clone());
            }
        }

        narrow_accept_encoding(&mut outbound);
        set_default(&mut outbound, USER_AGENT, self.default_user_agent);
        set_default(&mut outbound, ACCEPT, self.default_accept);

        match HeaderValue::from_str(target_base) {
            Ok(referer) => {
                outbound.insert(REFERER, referer);
            }
            Err(_) => {
                tracing::warn!(target_base = %target_base, "Target base is not a valid referer value");
                outbound.remove(REFERER);
            }
        }

        outbound
    }
}

/// Keep only the `accept-encoding` entries the client can decode.
///
/// The relayed body must be the decoded representation, so an origin may
/// only choose among codings in `DECODABLE_CODINGS`. With nothing left the
/// header is dropped and the client negotiates its own set.
fn narrow_accept_encoding(headers: &mut HeaderMap) {
    let kept: Vec<String> = headers
        .get_all(ACCEPT_ENCODING)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(str::trim)
        .filter(|entry| {
            let coding = entry.split(';').next().unwrap_or("").trim();
            DECODABLE_CODINGS
                .iter()
                .any(|c| coding.eq_ignore_ascii_case(c))
        })
        .map(str::to_string)
        .collect();

    headers.remove(ACCEPT_ENCODING);
    if kept.is_empty() {
        return;
    }
    match HeaderValue::from_str(&kept.join(", ")) {
        Ok(value) => {
            headers.insert(ACCEPT_ENCODING, value);
        }
        Err(_) => tracing::warn!("Dropping unrepresentable accept-encoding"),
    }
}

/// Insert `value` unless a non-empty value is already present.
fn set_default(headers: &mut HeaderMap, name: HeaderName, value: &'static str) {
    let present = headers
        .get_all(&name)
        .iter()
        .any(|v| !v.as_bytes().iter().all(u8::is_ascii_whitespace));
    if !present {
        headers.insert(name, HeaderValue::from_static(value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://origin.example";

    fn headers(pairs: &[(&str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (k, v) in pairs {
            map.append(
                HeaderName::from_bytes(k.as_bytes()).unwrap(),
                HeaderValue::from_str(v).unwrap(),
            );
        }
        map
    }

    #[test]
    fn test_excluded_headers_dropped() {
        let inbound = headers(&[
            ("Host", "relay.example"),
            ("X-Forwarded-For", "1.2.3.4"),
            ("x-forwarded-proto", "https"),
            ("X-Forwarded-Port", "443"),
            ("X-Datadog-Trace-Id", "123"),
            ("traceparent", "00-abc-def-01"),
            ("x-nf-request-id", "01H"),
            ("cookie", "a=b"),
        ]);
        let out = HeaderPolicy::default().filter(&inbound, BASE);

        for name in EXCLUDED_REQUEST_HEADERS {
            assert!(!out.contains_key(*name), "{name} leaked");
        }
        assert_eq!(out.get("cookie").unwrap(), "a=b");
    }

    #[test]
    fn test_exclusion_is_whole_name() {
        let inbound = headers(&[("x-forwarded-for-app", "keep"), ("hostname", "keep")]);
        let out = HeaderPolicy::default().filter(&inbound, BASE);
        assert_eq!(out.get("x-forwarded-for-app").unwrap(), "keep");
        assert_eq!(out.get("hostname").unwrap(), "keep");
    }

    #[test]
    fn test_multiple_casings_all_dropped() {
        let mut inbound = HeaderMap::new();
        inbound.append("x-forwarded-for", HeaderValue::from_static("1.1.1.1"));
        inbound.append(
            HeaderName::from_bytes(b"X-FORWARDED-FOR").unwrap(),
            HeaderValue::from_static("2.2.2.2"),
        );
        let out = HeaderPolicy::default().filter(&inbound, BASE);
        assert!(out.get_all("x-forwarded-for").iter().next().is_none());
    }

    #[test]
    fn test_defaults_applied() {
        let out = HeaderPolicy::default().filter(&HeaderMap::new(), BASE);
        assert_eq!(out.get(USER_AGENT).unwrap(), DEFAULT_USER_AGENT);
        assert_eq!(out.get(ACCEPT).unwrap(), DEFAULT_ACCEPT);
        assert_eq!(out.get(REFERER).unwrap(), BASE);
    }

    #[test]
    fn test_inbound_values_kept_referer_overwritten() {
        let inbound = headers(&[
            ("User-Agent", "curl/8.0"),
            ("Accept", "application/json"),
            ("Referer", "https://elsewhere.example/page"),
        ]);
        let out = HeaderPolicy::default().filter(&inbound, BASE);
        assert_eq!(out.get(USER_AGENT).unwrap(), "curl/8.0");
        assert_eq!(out.get(ACCEPT).unwrap(), "application/json");
        assert_eq!(out.get_all(REFERER).iter().count(), 1);
        assert_eq!(out.get(REFERER).unwrap(), BASE);
    }

    #[test]
    fn test_blank_user_agent_replaced() {
        let inbound = headers(&[("user-agent", "")]);
        let out = HeaderPolicy::default().filter(&inbound, BASE);
        assert_eq!(out.get(USER_AGENT).unwrap(), DEFAULT_USER_AGENT);
    }

    #[test]
    fn test_accept_encoding_narrowed() {
        let inbound = headers(&[("Accept-Encoding", "gzip, deflate, br, zstd;q=0.9, *")]);
        let out = HeaderPolicy::default().filter(&inbound, BASE);
        assert_eq!(out.get(ACCEPT_ENCODING).unwrap(), "gzip, deflate, br");
    }

    #[test]
    fn test_accept_encoding_keeps_qvalues() {
        let inbound = headers(&[("accept-encoding", "br;q=1.0, GZIP;q=0.5")]);
        let out = HeaderPolicy::default().filter(&inbound, BASE);
        assert_eq!(out.get(ACCEPT_ENCODING).unwrap(), "br;q=1.0, GZIP;q=0.5");
    }

    #[test]
    fn test_undecodable_accept_encoding_dropped() {
        let inbound = headers(&[("accept-encoding", "zstd"), ("accept-encoding", "compress")]);
        let out = HeaderPolicy::default().filter(&inbound, BASE);
        assert!(!out.contains_key(ACCEPT_ENCODING));
    }

    #[test]
    fn test_inbound_untouched() {
        let inbound = headers(&[("host", "relay.example")]);
        let before = inbound.clone();
        let _ = HeaderPolicy::default().filter(&inbound, BASE);
        assert_eq!(inbound, before);
    }

    #[test]
    fn test_custom_policy() {
        const EXCLUDED: &[&str] = &["x-secret"];
        let policy = HeaderPolicy {
            excluded: EXCLUDED,
            ..HeaderPolicy::default()
        };
        let inbound = headers(&[("X-Secret", "1"), ("host", "relay.example")]);
        let out = policy.filter(&inbound, BASE);
        assert!(!out.contains_key("x-secret"));
        assert!(out.contains_key("host"));
    }
}
