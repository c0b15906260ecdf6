//! End-to-end tests for the server-level endpoints
//!
//! Tests the home stats, Prometheus metrics and static assets.

mod common;

use common::{TestClient, TestServer, ALBUM_1_ID, ASSET_BYTES, ASSET_PATH};
use reqwest::StatusCode;
use serde_json::Value;

#[tokio::test]
async fn test_home_reports_uptime_and_version() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.get_home().await;
    assert_eq!(response.status(), StatusCode::OK);

    let stats: Value = response.json().await.unwrap();
    assert!(stats["uptime"].as_str().unwrap().starts_with("0d "));
    assert_eq!(stats["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_metrics_endpoint_exposes_text_format() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    disco_catalog_server::server::metrics::init_metrics();
    client.get_album(ALBUM_1_ID).await;

    let response = client.get_metrics().await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.text().await.unwrap();
    assert!(body.contains("disco_http_requests_total"));
    assert!(body.contains("disco_catalog_lookups_total"));
}

#[tokio::test]
async fn test_serves_assets() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.get_asset(ASSET_PATH).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(&response.bytes().await.unwrap()[..], ASSET_BYTES);

    let response = client.get_asset("covers/missing.jpg").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_route_returns_404() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client
        .client
        .get(format!("{}/tracks", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
