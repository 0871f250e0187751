//! Connected thermostat and sensor fleet from the device platform.
//!
//! The API key stays on the server; the dashboard only sees the summarized
//! fleet. A missing key or an upstream failure yields an empty, unavailable
//! fleet.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{instrument, warn};

use crate::config::DeviceConfig;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors talking to the device platform.
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// One device as shown in the fleet widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub device_id: String,
    pub device_type: String,
    pub name: String,
    pub online: bool,
}

/// `GET /api/devices` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceFleet {
    /// False when the platform is not configured or could not be reached.
    pub available: bool,
    pub devices: Vec<Device>,
    pub online: usize,
    pub offline: usize,
}

impl DeviceFleet {
    #[must_use]
    pub const fn unavailable() -> Self {
        Self {
            available: false,
            devices: Vec::new(),
            online: 0,
            offline: 0,
        }
    }

    #[must_use]
    pub fn from_devices(devices: Vec<Device>) -> Self {
        let online = devices.iter().filter(|d| d.online).count();
        Self {
            available: true,
            offline: devices.len() - online,
            online,
            devices,
        }
    }
}

// Platform response, reduced to the fields used.
#[derive(Debug, Deserialize)]
struct ListDevicesResponse {
    #[serde(default)]
    devices: Vec<PlatformDevice>,
}

#[derive(Debug, Deserialize)]
struct PlatformDevice {
    device_id: String,
    #[serde(default)]
    device_type: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    properties: PlatformDeviceProperties,
}

#[derive(Debug, Default, Deserialize)]
struct PlatformDeviceProperties {
    #[serde(default)]
    online: bool,
    #[serde(default)]
    name: Option<String>,
}

impl From<PlatformDevice> for Device {
    fn from(device: PlatformDevice) -> Self {
        let name = device
            .display_name
            .or(device.properties.name)
            .unwrap_or_else(|| device.device_id.clone());
        Self {
            device_id: device.device_id,
            device_type: device.device_type,
            name,
            online: device.properties.online,
        }
    }
}

/// Server-side proxy to the device platform.
#[derive(Clone)]
pub struct DeviceService {
    client: reqwest::Client,
    api_key: Option<SecretString>,
    base_url: String,
}

impl std::fmt::Debug for DeviceService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceService")
            .field("configured", &self.api_key.is_some())
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl DeviceService {
    #[must_use]
    pub fn new(config: &DeviceConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();

        Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    /// The current fleet, or an unavailable fleet on any failure.
    #[instrument(skip(self))]
    pub async fn fleet(&self) -> DeviceFleet {
        let Some(api_key) = &self.api_key else {
            return DeviceFleet::unavailable();
        };

        match self.list_devices(api_key).await {
            Ok(devices) => DeviceFleet::from_devices(devices),
            Err(e) => {
                warn!(error = %e, "Device platform request failed");
                DeviceFleet::unavailable()
            }
        }
    }

    async fn list_devices(&self, api_key: &SecretString) -> Result<Vec<Device>, DeviceError> {
        let response: ListDevicesResponse = self
            .client
            .post(format!("{}/devices/list", self.base_url))
            .bearer_auth(api_key.expose_secret())
            .json(&serde_json::json!({}))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(response.devices.into_iter().map(Into::into).collect())
    }
}
