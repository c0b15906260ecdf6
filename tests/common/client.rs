//! HTTP client for end-to-end tests
//!
//! This module provides a high-level HTTP client that wraps reqwest
//! and provides methods for all catalog server endpoints.
//!
//! When API routes change, update only this file.

use super::constants::*;
use reqwest::Response;
use std::time::Duration;

/// HTTP test client
pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    async fn get(&self, path: &str) -> Response {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .expect("Request failed")
    }

    // ========================================================================
    // Server
    // ========================================================================

    pub async fn get_home(&self) -> Response {
        self.get("/").await
    }

    pub async fn get_metrics(&self) -> Response {
        self.get("/metrics").await
    }

    pub async fn get_asset(&self, path: &str) -> Response {
        self.get(&format!("/assets/{}", path)).await
    }

    // ========================================================================
    // Albums
    // ========================================================================

    pub async fn get_albums(&self) -> Response {
        self.get("/albums").await
    }

    pub async fn get_albums_summary(&self) -> Response {
        self.get("/albums?view=summary").await
    }

    pub async fn get_album(&self, id: &str) -> Response {
        self.get(&format!("/albums/{}", id)).await
    }

    // ========================================================================
    // Artists
    // ========================================================================

    pub async fn get_artists(&self) -> Response {
        self.get("/artists").await
    }

    pub async fn get_artists_by_genre(&self, genre_link: &str) -> Response {
        self.get(&format!("/artists?genre={}", genre_link)).await
    }

    pub async fn get_artist(&self, id: &str) -> Response {
        self.get(&format!("/artists/{}", id)).await
    }

    pub async fn get_artist_albums(&self, id: &str) -> Response {
        self.get(&format!("/artists/{}/albums", id)).await
    }

    // ========================================================================
    // Genres
    // ========================================================================

    pub async fn get_genres(&self) -> Response {
        self.get("/genres").await
    }

    pub async fn get_genre(&self, link: &str) -> Response {
        self.get(&format!("/genres/{}", link)).await
    }
}
