//! Local HTTP host.
//!
//! # Responsibilities
//! - Create the Axum router with a catch-all relay handler
//! - Wire up middleware (tracing, request ID, platform ceiling)
//! - Buffer the request body and hand the invocation to the dispatcher
//! - Bind to a listener and shut down gracefully
//!
//! Each request is one invocation: the handler builds a fresh dispatcher
//! and shares nothing between requests except the immutable config.
//! Hitting the platform ceiling answers like an upstream timeout (502 with
//! CORS headers), not with a bare 408.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::Response,
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::ProxyConfig;
use crate::error::UpstreamError;
use crate::host::{self, local::LocalAdapter, HostAdapter};
use crate::http::dispatcher::Dispatcher;
use crate::http::request::InboundRequest;
use crate::http::response::ProxyResponse;
use crate::net::HttpUpstream;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ProxyConfig>,
    pub upstream: HttpUpstream,
}

/// HTTP server hosting the relay locally.
pub struct HttpServer {
    router: Router,
    config: Arc<ProxyConfig>,
}

impl HttpServer {
    pub fn new(config: ProxyConfig) -> Self {
        let config = Arc::new(config);
        let state = AppState {
            config: config.clone(),
            upstream: HttpUpstream,
        };
        let router = Self::build_router(state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(relay_handler))
            .route("/", any(relay_handler))
            .with_state(state)
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            target_base = %self.config.target_base(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    /// The configured router, for serving in-process.
    pub fn into_router(self) -> Router {
        self.router
    }
}

async fn relay_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let (parts, body) = request.into_parts();

    let body = match axum::body::to_bytes(body, state.config.listener.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(
                path = %parts.uri.path(),
                limit = state.config.listener.max_body_bytes,
                error = %e,
                "Failed to buffer request body"
            );
            let err = UpstreamError::other(format!("request body unreadable: {e}"));
            return LocalAdapter.to_reply(ProxyResponse::from_error(&err));
        }
    };

    let mut shape = InboundRequest::new(parts.method.clone(), parts.uri.path());
    if let Some(query) = parts.uri.query() {
        shape = shape.with_query(query);
    }
    let target_url = shape.target_url(state.config.target_base());
    let ceiling = state.config.timeouts.platform_ceiling_secs.map(Duration::from_secs);

    let dispatcher = Dispatcher::new(state.config.clone(), state.upstream);
    within_ceiling(
        ceiling,
        target_url,
        host::invoke(&LocalAdapter, &dispatcher, (parts, body)),
    )
    .await
}

/// Await `reply`, answering a timeout 502 if it outlives `ceiling`.
async fn within_ceiling<F>(ceiling: Option<Duration>, target_url: String, reply: F) -> Response
where
    F: Future<Output = Response>,
{
    let Some(ceiling) = ceiling else {
        return reply.await;
    };

    match tokio::time::timeout(ceiling, reply).await {
        Ok(response) => response,
        Err(_) => {
            tracing::error!(url = %target_url, ceiling = ?ceiling, "Platform ceiling reached");
            let err = UpstreamError::Timeout { url: target_url };
            LocalAdapter.to_reply(ProxyResponse::from_error(&err))
        }
    }
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
