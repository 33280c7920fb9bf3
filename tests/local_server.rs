//! The local Axum host, end to end.

mod common;

use std::net::SocketAddr;

use tokio::net::TcpListener;

use common::{start_static_origin, Reply};
use origin_relay::{HttpServer, ProxyConfig};

async fn start_relay(config: ProxyConfig) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = HttpServer::new(config).into_router();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

#[tokio::test]
async fn test_preflight_over_http() {
    let relay = start_relay(ProxyConfig::for_target("http://127.0.0.1:9")).await;

    let response = reqwest::Client::new()
        .request(reqwest::Method::OPTIONS, format!("http://{relay}/api/items"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
    assert_eq!(response.headers()["access-control-max-age"], "86400");
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_get_relayed_and_rewritten() {
    let mut origin =
        start_static_origin(Reply::ok("text/html", r#"<script src="/app.js"></script>"#)).await;
    let base = origin.base_url();
    let relay = start_relay(ProxyConfig::for_target(base.as_str())).await;

    let response = reqwest::Client::new()
        .get(format!("http://{relay}/index.html?lang=en"))
        .header("x-forwarded-for", "198.51.100.4")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(response.headers()["access-control-expose-headers"], "*");
    let body = response.text().await.unwrap();
    assert_eq!(body, format!(r#"<script src="{base}/app.js"></script>"#));

    let seen = origin.next_request().await;
    assert_eq!(seen.target, "/index.html?lang=en");
    assert!(seen.header("x-forwarded-for").is_none());
    assert!(seen.header("x-request-id").is_none());
    assert_eq!(seen.header("referer"), Some(base.as_str()));
}

#[tokio::test]
async fn test_post_body_forwarded() {
    let mut origin = start_static_origin(Reply::ok("text/plain", "created").status(201, "Created")).await;
    let relay = start_relay(ProxyConfig::for_target(origin.base_url())).await;

    let response = reqwest::Client::new()
        .post(format!("http://{relay}/submit"))
        .body("name=widget")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 201);
    assert_eq!(response.text().await.unwrap(), "created");
    assert_eq!(origin.next_request().await.body, b"name=widget".to_vec());
}

#[tokio::test]
async fn test_oversized_body_rejected() {
    let mut config = ProxyConfig::for_target("http://127.0.0.1:9");
    config.listener.max_body_bytes = 16;
    let relay = start_relay(config).await;

    let response = reqwest::Client::new()
        .post(format!("http://{relay}/upload"))
        .body(vec![b'x'; 64])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 502);
    assert!(response
        .text()
        .await
        .unwrap()
        .starts_with("Proxy failed: request body unreadable"));
}
