//! Integration tests for the HVAC dashboard API.
//!
//! Each test spawns the full router (tracing, CORS, upload serving) on an
//! ephemeral port backed by a fresh in-memory store, and talks to it over
//! HTTP with `reqwest`.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p hvac-dash-integration-tests
//! ```

use std::net::SocketAddr;

use axum::Router;
use tempfile::TempDir;

use hvac_dash_server::config::DashboardConfig;
use hvac_dash_server::db::{Database, ReferenceDb, SeedReport, seed_data};
use hvac_dash_server::{AppState, build_router};

/// A running server plus a client pointed at it.
pub struct TestApp {
    pub base_url: String,
    pub client: reqwest::Client,
    pub state: AppState,
    // Removed on drop
    _uploads: TempDir,
}

impl TestApp {
    /// Spawn with default configuration and an empty store.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot bind.
    pub async fn spawn() -> Self {
        Self::spawn_with(|_| {}).await
    }

    /// Spawn after adjusting the configuration.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot bind or the temp dir cannot be created.
    pub async fn spawn_with(configure: impl FnOnce(&mut DashboardConfig)) -> Self {
        let uploads = tempfile::tempdir().expect("Failed to create upload dir");
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no address");
        let base_url = format!("http://{addr}");

        let mut config = DashboardConfig::default();
        config.public_url.clone_from(&base_url);
        config.uploads.dir = uploads.path().to_path_buf();
        configure(&mut config);

        let state = AppState::new(config, Database::Reference(ReferenceDb::default()));
        let app = build_router(state.clone());

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Test server failed");
        });

        Self {
            base_url,
            client: reqwest::Client::new(),
            state,
            _uploads: uploads,
        }
    }

    /// Spawn and run the startup seed.
    ///
    /// # Panics
    ///
    /// Panics if seeding fails.
    pub async fn spawn_seeded() -> Self {
        let app = Self::spawn().await;
        app.seed().await;
        app
    }

    /// Run the seed routine against this app's store.
    ///
    /// # Panics
    ///
    /// Panics if seeding fails.
    pub async fn seed(&self) -> SeedReport {
        seed_data(self.state.db()).await.expect("Seeding failed")
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

/// Serve `router` on an ephemeral port, standing in for a third-party API.
///
/// # Panics
///
/// Panics if the listener cannot bind.
pub async fn spawn_fake(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind fake listener");
    let addr: SocketAddr = listener.local_addr().expect("Listener has no address");

    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("Fake server failed");
    });

    format!("http://{addr}")
}
