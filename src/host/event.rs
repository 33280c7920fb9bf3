//! Serverless function event shape.
//!
//! ```json
//! { "httpMethod": "GET", "path": "/a", "rawQuery": "x=1",
//!   "headers": {"accept": "text/html"}, "body": null, "isBase64Encoded": false }
//! ```

use std::collections::{BTreeMap, HashMap};

use axum::http::{HeaderMap, HeaderName, HeaderValue, Method};
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::host::{HostAdapter, HostError};
use crate::http::request::InboundRequest;
use crate::http::response::ProxyResponse;

/// Inbound request descriptor.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionEvent {
    pub http_method: String,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub raw_query: Option<String>,
    #[serde(default)]
    pub headers: Option<HashMap<String, String>>,
    #[serde(default)]
    pub multi_value_headers: Option<HashMap<String, Vec<String>>>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub is_base64_encoded: bool,
}

impl FunctionEvent {
    pub fn from_json(input: &str) -> Result<Self, HostError> {
        serde_json::from_str(input).map_err(|e| HostError::MalformedEvent(e.to_string()))
    }
}

/// Outbound response descriptor.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    /// Every header that had more than one value (e.g. `set-cookie`).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub multi_value_headers: BTreeMap<String, Vec<String>>,
    pub body: String,
    pub is_base64_encoded: bool,
}

/// Adapter for `FunctionEvent` / `FunctionResponse`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventAdapter;

impl HostAdapter for EventAdapter {
    type Event = FunctionEvent;
    type Reply = FunctionResponse;

    fn to_inbound(&self, event: FunctionEvent) -> Result<InboundRequest, HostError> {
        let method = Method::from_bytes(event.http_method.trim().to_ascii_uppercase().as_bytes())
            .map_err(|_| HostError::InvalidMethod(event.http_method.clone()))?;

        let mut headers = HeaderMap::new();
        for (name, value) in event.headers.iter().flatten() {
            append_header(&mut headers, name, value);
        }
        for (name, values) in event.multi_value_headers.iter().flatten() {
            if headers.contains_key(name.to_ascii_lowercase().as_str()) {
                continue;
            }
            for value in values {
                append_header(&mut headers, name, value);
            }
        }

        Ok(InboundRequest {
            method,
            path: event.path.filter(|p| !p.is_empty()).unwrap_or_else(|| "/".to_string()),
            query: event.raw_query.filter(|q| !q.is_empty()),
            headers,
            body: event.body.map(Bytes::from),
            is_base64_encoded: event.is_base64_encoded,
        })
    }

    fn to_reply(&self, response: ProxyResponse) -> FunctionResponse {
        let mut headers = BTreeMap::new();
        let mut multi_value_headers = BTreeMap::new();

        for name in response.headers.keys() {
            let values: Vec<String> = response
                .headers
                .get_all(name)
                .iter()
                .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
                .collect();
            headers.insert(name.to_string(), values.join(", "));
            if values.len() > 1 {
                multi_value_headers.insert(name.to_string(), values);
            }
        }

        FunctionResponse {
            status_code: response.status.as_u16(),
            headers,
            multi_value_headers,
            body: response.encoded_body(),
            is_base64_encoded: response.base64,
        }
    }
}

/// Adapter over the raw JSON document, so malformed input still gets a reply.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEventAdapter;

impl HostAdapter for JsonEventAdapter {
    type Event = String;
    type Reply = FunctionResponse;

    fn to_inbound(&self, raw: String) -> Result<InboundRequest, HostError> {
        EventAdapter.to_inbound(FunctionEvent::from_json(&raw)?)
    }

    fn to_reply(&self, response: ProxyResponse) -> FunctionResponse {
        EventAdapter.to_reply(response)
    }
}

fn append_header(headers: &mut HeaderMap, name: &str, value: &str) {
    match (
        HeaderName::from_bytes(name.as_bytes()),
        HeaderValue::from_str(value),
    ) {
        (Ok(name), Ok(value)) => {
            headers.append(name, value);
        }
        _ => tracing::warn!(header = %name, "Dropping invalid inbound header"),
    }
}
