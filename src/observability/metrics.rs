//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_requests_total` (counter): invocations by method, status
//! - `relay_request_duration_seconds` (histogram): end-to-end latency by method
//! - `relay_upstream_errors_total` (counter): classified transport failures by kind
//! - `relay_short_circuit_total` (counter): preflight / websocket answers
//! - `relay_rewrites_total` (counter): rewrite outcomes
//!
//! # Design Decisions
//! - Recording without an installed recorder is a no-op, so the one-shot
//!   invocation path pays nothing
//! - The Prometheus endpoint is only started by the long-running local host

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(method: &str, status: u16, start: Instant) {
    metrics::counter!(
        "relay_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("relay_request_duration_seconds", "method" => method.to_string())
        .record(start.elapsed().as_secs_f64());
}

pub fn record_upstream_error(kind: &'static str) {
    metrics::counter!("relay_upstream_errors_total", "kind" => kind).increment(1);
}

pub fn record_short_circuit(kind: &'static str) {
    metrics::counter!("relay_short_circuit_total", "kind" => kind).increment(1);
}

pub fn record_rewrite(outcome: &'static str) {
    metrics::counter!("relay_rewrites_total", "outcome" => outcome).increment(1);
}
