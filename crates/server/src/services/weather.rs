//! Current weather for the dashboard's grid-load widget.
//!
//! Without a provider key the service returns a fixed Toronto report. With a
//! key it queries the provider's current-conditions endpoint, derives grid
//! load and HVAC impact from the temperature, and caches the result for five
//! minutes (the dashboard polls on the same interval). Upstream failures are
//! logged and reported as "no data" rather than surfaced as errors.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::config::WeatherConfig;

const CACHE_TTL: Duration = Duration::from_secs(300);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// At or below this many °C heating demand is high.
const HEATING_THRESHOLD: f64 = 5.0;
/// At or above this many °C cooling demand is high.
const COOLING_THRESHOLD: f64 = 25.0;
const GRID_HIGH_COLD: f64 = -10.0;
const GRID_HIGH_HOT: f64 = 30.0;

/// Errors talking to the weather provider.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    #[error("invalid provider URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("provider returned no conditions")]
    EmptyResponse,
}

// The request URL carries the provider key, so it is dropped before the
// error can reach a log line.
impl From<reqwest::Error> for WeatherError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e.without_url())
    }
}

/// Load on the electricity grid implied by the temperature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GridLoad {
    Low,
    Moderate,
    High,
}

impl GridLoad {
    #[must_use]
    pub fn from_temperature(celsius: f64) -> Self {
        if celsius <= GRID_HIGH_COLD || celsius >= GRID_HIGH_HOT {
            Self::High
        } else if celsius <= HEATING_THRESHOLD || celsius >= COOLING_THRESHOLD {
            Self::Moderate
        } else {
            Self::Low
        }
    }
}

/// What the temperature means for HVAC demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HvacImpact {
    #[serde(rename = "Heating Demand High")]
    HeatingDemandHigh,
    #[serde(rename = "Cooling Demand High")]
    CoolingDemandHigh,
    Normal,
}

impl HvacImpact {
    #[must_use]
    pub fn from_temperature(celsius: f64) -> Self {
        if celsius <= HEATING_THRESHOLD {
            Self::HeatingDemandHigh
        } else if celsius >= COOLING_THRESHOLD {
            Self::CoolingDemandHigh
        } else {
            Self::Normal
        }
    }
}

/// `GET /api/weather` response. All fields are null when no data is available.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReport {
    /// Whole degrees Celsius.
    pub temp: Option<i32>,
    pub condition: Option<String>,
    pub grid_load: Option<GridLoad>,
    pub hvac_impact: Option<HvacImpact>,
}

impl WeatherReport {
    /// Fixed report served when no provider is configured.
    #[must_use]
    pub fn mock() -> Self {
        Self {
            temp: Some(-2),
            condition: Some("Partly Cloudy".to_string()),
            grid_load: Some(GridLoad::Moderate),
            hvac_impact: Some(HvacImpact::HeatingDemandHigh),
        }
    }

    /// Report used when the provider cannot be reached.
    #[must_use]
    pub const fn unavailable() -> Self {
        Self {
            temp: None,
            condition: None,
            grid_load: None,
            hvac_impact: None,
        }
    }

    /// Build a report from a measured temperature and condition text.
    #[must_use]
    pub fn from_conditions(celsius: f64, condition: String) -> Self {
        #[allow(clippy::cast_possible_truncation)] // air temperatures fit in i32
        let temp = celsius.round() as i32;
        Self {
            temp: Some(temp),
            condition: Some(condition),
            grid_load: Some(GridLoad::from_temperature(celsius)),
            hvac_impact: Some(HvacImpact::from_temperature(celsius)),
        }
    }
}

// Provider response, reduced to the fields used.
#[derive(Debug, Deserialize)]
struct CurrentConditions {
    main: MainReadings,
    #[serde(default)]
    weather: Vec<ConditionEntry>,
}

#[derive(Debug, Deserialize)]
struct MainReadings {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct ConditionEntry {
    main: String,
    #[serde(default)]
    description: String,
}

/// Weather proxy with a five-minute cache.
#[derive(Clone)]
pub struct WeatherService {
    inner: Arc<WeatherServiceInner>,
}

struct WeatherServiceInner {
    client: reqwest::Client,
    api_key: Option<SecretString>,
    city: String,
    base_url: String,
    cache: Cache<String, WeatherReport>,
}

impl std::fmt::Debug for WeatherService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherService")
            .field("configured", &self.is_configured())
            .field("city", &self.inner.city)
            .finish_non_exhaustive()
    }
}

impl WeatherService {
    #[must_use]
    pub fn new(config: &WeatherConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(16)
            .time_to_live(CACHE_TTL)
            .build();

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();

        Self {
            inner: Arc::new(WeatherServiceInner {
                client,
                api_key: config.api_key.clone(),
                city: config.city.clone(),
                base_url: config.base_url.trim_end_matches('/').to_string(),
                cache,
            }),
        }
    }

    /// Whether a provider key is configured.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.inner.api_key.is_some()
    }

    /// Current report for the configured city.
    #[instrument(skip(self), fields(city = %self.inner.city))]
    pub async fn current(&self) -> WeatherReport {
        let Some(api_key) = &self.inner.api_key else {
            return WeatherReport::mock();
        };

        if let Some(cached) = self.inner.cache.get(&self.inner.city).await {
            debug!("Weather cache hit");
            return cached;
        }

        match self.fetch(api_key).await {
            Ok(report) => {
                self.inner
                    .cache
                    .insert(self.inner.city.clone(), report.clone())
                    .await;
                report
            }
            Err(e) => {
                warn!(error = %e, "Weather provider request failed");
                WeatherReport::unavailable()
            }
        }
    }

    async fn fetch(&self, api_key: &SecretString) -> Result<WeatherReport, WeatherError> {
        let url = Url::parse_with_params(
            &format!("{}/data/2.5/weather", self.inner.base_url),
            &[
                ("q", self.inner.city.as_str()),
                ("units", "metric"),
                ("appid", api_key.expose_secret()),
            ],
        )?;

        let conditions: CurrentConditions = self
            .inner
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let entry = conditions
            .weather
            .into_iter()
            .next()
            .ok_or(WeatherError::EmptyResponse)?;
        let condition = if entry.description.is_empty() {
            entry.main
        } else {
            title_case(&entry.description)
        };

        Ok(WeatherReport::from_conditions(conditions.main.temp, condition))
    }
}

/// `"broken clouds"` -> `"Broken Clouds"`.
fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hvac_impact_bands() {
        assert_eq!(HvacImpact::from_temperature(-2.0), HvacImpact::HeatingDemandHigh);
        assert_eq!(HvacImpact::from_temperature(5.0), HvacImpact::HeatingDemandHigh);
        assert_eq!(HvacImpact::from_temperature(5.1), HvacImpact::Normal);
        assert_eq!(HvacImpact::from_temperature(24.9), HvacImpact::Normal);
        assert_eq!(HvacImpact::from_temperature(25.0), HvacImpact::CoolingDemandHigh);
    }

    #[test]
    fn test_grid_load_bands() {
        assert_eq!(GridLoad::from_temperature(-15.0), GridLoad::High);
        assert_eq!(GridLoad::from_temperature(-10.0), GridLoad::High);
        assert_eq!(GridLoad::from_temperature(-2.0), GridLoad::Moderate);
        assert_eq!(GridLoad::from_temperature(15.0), GridLoad::Low);
        assert_eq!(GridLoad::from_temperature(27.0), GridLoad::Moderate);
        assert_eq!(GridLoad::from_temperature(31.0), GridLoad::High);
    }

    #[test]
    fn test_mock_payload() {
        let json = serde_json::to_value(WeatherReport::mock()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "temp": -2,
                "condition": "Partly Cloudy",
                "gridLoad": "Moderate",
                "hvacImpact": "Heating Demand High"
            })
        );
    }

    #[test]
    fn test_unavailable_is_all_null() {
        let json = serde_json::to_value(WeatherReport::unavailable()).unwrap();
        assert!(json["temp"].is_null());
        assert!(json["hvacImpact"].is_null());
    }

    #[test]
    fn test_from_conditions_rounds() {
        let report = WeatherReport::from_conditions(-2.4, "Light Snow".to_string());
        assert_eq!(report.temp, Some(-2));
        assert_eq!(report.grid_load, Some(GridLoad::Moderate));
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("broken clouds"), "Broken Clouds");
        assert_eq!(title_case(""), "");
    }

    #[tokio::test]
    async fn test_unconfigured_serves_mock() {
        let service = WeatherService::new(&WeatherConfig::default());
        assert!(!service.is_configured());
        assert_eq!(service.current().await, WeatherReport::mock());
    }

    #[tokio::test]
    async fn test_unreachable_provider_reports_no_data() {
        let service = WeatherService::new(&WeatherConfig {
            api_key: Some(SecretString::from("k3y")),
            city: "Toronto".to_string(),
            base_url: "http://127.0.0.1:9".to_string(),
        });
        assert_eq!(service.current().await, WeatherReport::unavailable());
    }

    #[tokio::test]
    async fn test_provider_error_omits_api_key() {
        let key = SecretString::from("0f9c2e51d8a7b3e4");
        let service = WeatherService::new(&WeatherConfig {
            api_key: Some(key.clone()),
            city: "Toronto".to_string(),
            base_url: "http://127.0.0.1:9".to_string(),
        });

        let err = service.fetch(&key).await.unwrap_err();
        assert!(matches!(err, WeatherError::Http(_)));
        let rendered = format!("{err} {err:?}");
        assert!(!rendered.contains("0f9c2e51d8a7b3e4"), "{rendered}");
        assert!(!rendered.contains("appid"), "{rendered}");
    }
}
