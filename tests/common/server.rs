//! Test server lifecycle management
//!
//! This module manages spawning and shutting down test HTTP servers.
//! Each test gets an isolated server with its own catalog database.

use super::constants::*;
use super::fixtures::{create_test_catalog, test_seed};
use disco_catalog_server::catalog::PricingConfig;
use disco_catalog_server::catalog_store::{InMemoryCatalogStore, SqliteCatalogStore};
use disco_catalog_server::server::state::GuardedCatalogStore;
use disco_catalog_server::server::{make_app, RequestsLoggingLevel, ServerConfig};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;

/// Test server instance with an isolated catalog
///
/// When dropped, the server gracefully shuts down and temp resources are cleaned up.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// The port the server is listening on
    pub port: u16,

    // Private fields - keep resources alive until drop
    _temp_catalog_dir: Option<TempDir>,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

/// Seeded, jitter-free pricing so expected prices are exact
fn test_config(port: u16, assets_dir: Option<std::path::PathBuf>) -> ServerConfig {
    ServerConfig {
        port,
        requests_logging_level: RequestsLoggingLevel::None,
        assets_dir,
        pricing: PricingConfig {
            jitter_dollars: 0,
            ..Default::default()
        },
        pricing_seed: Some(TEST_PRICING_SEED),
        repository_timeout: Duration::from_secs(5),
    }
}

impl TestServer {
    /// Spawns a new test server backed by a temporary SQLite catalog
    ///
    /// # Panics
    ///
    /// Panics if the catalog cannot be created, the port cannot be bound, or
    /// the server doesn't become ready within timeout.
    pub async fn spawn() -> Self {
        let (temp_catalog_dir, catalog_db_path, assets_path) =
            create_test_catalog().expect("Failed to create test catalog");

        let catalog_store: GuardedCatalogStore = Arc::new(
            SqliteCatalogStore::new(&catalog_db_path).expect("Failed to open catalog store"),
        );

        Self::spawn_with_store(catalog_store, Some(assets_path), Some(temp_catalog_dir)).await
    }

    /// Spawns a new test server serving the seed fixture from memory
    pub async fn spawn_in_memory() -> Self {
        let seed = test_seed().expect("Failed to parse test seed");
        let catalog_store: GuardedCatalogStore = Arc::new(InMemoryCatalogStore::from(seed));

        Self::spawn_with_store(catalog_store, None, None).await
    }

    async fn spawn_with_store(
        catalog_store: GuardedCatalogStore,
        assets_dir: Option<std::path::PathBuf>,
        temp_catalog_dir: Option<TempDir>,
    ) -> Self {
        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");

        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();

        let base_url = format!("http://127.0.0.1:{}", port);

        // Create shutdown channel
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        let app = make_app(test_config(port, assets_dir), catalog_store)
            .expect("Failed to build app");

        // Spawn server in background task with graceful shutdown
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Server failed");
        });

        let server = Self {
            base_url,
            port,
            _temp_catalog_dir: temp_catalog_dir,
            _shutdown_tx: Some(shutdown_tx),
        };

        server.wait_for_ready().await;

        server
    }

    /// Waits for the server to become ready by polling the home endpoint
    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        loop {
            if start.elapsed() > timeout {
                panic!(
                    "Server did not become ready within {}ms",
                    SERVER_READY_TIMEOUT_MS
                );
            }

            match client.get(format!("{}/", self.base_url)).send().await {
                Ok(response) if response.status().is_success() => return,
                _ => {
                    tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
                }
            }
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
