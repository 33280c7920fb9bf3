//! Origin relay, local host.
//!
//! ```text
//!     Client Request      ┌──────────────────────────────────────────────┐
//!     ────────────────────┼─▶ http::server ─▶ host::local ─▶ dispatcher ─┼──▶ origin
//!                         │                                     │        │
//!     Client Response     │                                  rewrite     │
//!     ◀───────────────────┼── http::server ◀─ host::local ◀─ response ◀──┼─── origin
//!                         └──────────────────────────────────────────────┘
//! ```
//!
//! Configuration comes from `RELAY_CONFIG` (TOML) and environment overrides;
//! `PROXY_PASS` names the origin.

use tokio::net::TcpListener;

use origin_relay::config;
use origin_relay::observability::{logging, metrics};
use origin_relay::resilience::timeouts;
use origin_relay::HttpServer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = config::from_env()?;
    logging::init(&config.observability);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "origin-relay starting");
    tracing::info!(
        target_base = %config.target_base(),
        bind_address = %config.listener.bind_address,
        upstream_timeout = ?timeouts::effective_timeout(&config.timeouts),
        max_redirects = config.upstream.max_redirects,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    HttpServer::new(config).run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
