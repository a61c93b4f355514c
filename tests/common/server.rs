//! Test server lifecycle management
//!
//! This module manages spawning and shutting down test HTTP servers.
//! Each test gets an isolated server with its own database and fakes.

use super::constants::*;
use super::fakes::{FakeCategorizer, FakeSpotify, FakeWikipedia};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;
use toronto_artists_server::config::EnrichmentSettings;
use toronto_artists_server::server::{
    make_app, RequestsLoggingLevel, ServerConfig, ServerState, Services,
};
use toronto_artists_server::taxonomy::SqliteTaxonomyStore;
use toronto_artists_server::user::{SpotifyTokens, UserStore};

/// Test server instance with an isolated database
///
/// When dropped, the server gracefully shuts down and temp resources are cleaned up.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// Store for direct database access in tests
    pub store: Arc<SqliteTaxonomyStore>,

    pub wikipedia: Arc<FakeWikipedia>,
    pub spotify: Arc<FakeSpotify>,
    pub categorizer: Arc<FakeCategorizer>,

    // Private fields - keep resources alive until drop
    _temp_db_dir: TempDir,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

fn seed_listener(store: &SqliteTaxonomyStore) {
    store
        .upsert_user(
            TEST_USER_ID,
            Some(TEST_USER_NAME),
            Some(TEST_USER_EMAIL),
            &SpotifyTokens {
                access_token: TEST_ACCESS_TOKEN.to_string(),
                refresh_token: None,
            },
        )
        .expect("Failed to seed test listener");
}

impl TestServer {
    /// Spawns a new test server on a random port
    ///
    /// This function:
    /// 1. Creates a temporary taxonomy database with one Spotify listener
    /// 2. Builds the real router over fake upstream clients
    /// 3. Binds to a random port (127.0.0.1:0)
    /// 4. Spawns the server in a background task
    /// 5. Waits for the server to be ready
    pub async fn spawn() -> Self {
        Self::spawn_with_settings(EnrichmentSettings::default()).await
    }

    pub async fn spawn_with_settings(enrichment: EnrichmentSettings) -> Self {
        let temp_db_dir = TempDir::new().expect("Failed to create temp dir");
        let store = Arc::new(
            SqliteTaxonomyStore::new(temp_db_dir.path().join("taxonomy.db"))
                .expect("Failed to open taxonomy store"),
        );
        seed_listener(&store);

        let wikipedia = Arc::new(FakeWikipedia::default());
        let spotify = Arc::new(FakeSpotify::default());
        let categorizer = Arc::new(FakeCategorizer::default());

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

        let config = ServerConfig {
            requests_logging_level: RequestsLoggingLevel::None,
            port,
            metrics_port: 0,
            frontend_base_url: FRONTEND_BASE_URL.to_string(),
        };
        let services = Services {
            taxonomy_store: store.clone(),
            user_store: store.clone(),
            wikipedia: wikipedia.clone(),
            spotify: spotify.clone(),
            categorizer: categorizer.clone(),
        };
        let app = make_app(ServerState::new(config, services, enrichment))
            .expect("Failed to build app");

        // Spawn server in background task with graceful shutdown
        tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            })
            .await
            .expect("Server failed");
        });

        let server = Self {
            base_url,
            store,
            wikipedia,
            spotify,
            categorizer,
            _temp_db_dir: temp_db_dir,
            _shutdown_tx: Some(shutdown_tx),
        };

        server.wait_for_ready().await;

        server
    }

    /// Waits for the server to become ready by polling the /status endpoint
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

            match client.get(format!("{}/status", self.base_url)).send().await {
                Ok(response) if response.status().is_success() => {
                    return;
                }
                _ => {
                    tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
                }
            }
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        // Send shutdown signal
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
        // TempDir will be cleaned up automatically
    }
}
