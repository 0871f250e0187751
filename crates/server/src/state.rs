//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::DashboardConfig;
use crate::db::Database;
use crate::services::{DeviceService, UploadService, WeatherService};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; holds the store handle, configuration and
/// the third-party proxies.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: DashboardConfig,
    db: Database,
    weather: WeatherService,
    devices: DeviceService,
    uploads: UploadService,
}

impl AppState {
    /// Create application state from configuration and an opened store.
    #[must_use]
    pub fn new(config: DashboardConfig, db: Database) -> Self {
        let weather = WeatherService::new(&config.weather);
        let devices = DeviceService::new(&config.devices);
        let uploads = UploadService::new(&config.uploads, &config.public_url);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                db,
                weather,
                devices,
                uploads,
            }),
        }
    }

    /// Get a reference to the dashboard configuration.
    #[must_use]
    pub fn config(&self) -> &DashboardConfig {
        &self.inner.config
    }

    /// Get a reference to the store handle.
    #[must_use]
    pub fn db(&self) -> &Database {
        &self.inner.db
    }

    #[must_use]
    pub fn weather(&self) -> &WeatherService {
        &self.inner.weather
    }

    #[must_use]
    pub fn devices(&self) -> &DeviceService {
        &self.inner.devices
    }

    #[must_use]
    pub fn uploads(&self) -> &UploadService {
        &self.inner.uploads
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("driver", &self.inner.db.driver())
            .field("weather", &self.inner.weather)
            .field("devices", &self.inner.devices)
            .field("uploads", &self.inner.uploads)
            .finish_non_exhaustive()
    }
}
