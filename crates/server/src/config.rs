//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Store
//! - `DATABASE_URL` / `HVAC_DATABASE_URL` - `PostgreSQL` connection string.
//!   When neither is set the server runs on the in-memory reference store.
//! - `HVAC_AUTO_MIGRATE` - Apply migrations at startup (default: false)
//!
//! ## HTTP
//! - `HVAC_HOST` - Bind address (default: 127.0.0.1)
//! - `HVAC_PORT` - Listen port (default: 5000)
//! - `HVAC_PUBLIC_URL` - Base URL used in presigned upload URLs
//!   (default: `http://{host}:{port}`)
//! - `HVAC_CORS_ORIGIN` - Browser origin allowed to call the API
//! - `HVAC_LOG_FORMAT` - `text` or `json` (default: text)
//!
//! ## Logo uploads
//! - `HVAC_UPLOAD_DIR` - Object directory (default: uploads)
//! - `HVAC_UPLOAD_SECRET` - HMAC key for upload URLs (default: random per process)
//! - `HVAC_UPLOAD_MAX_BYTES` - Size limit (default: 5242880)
//! - `HVAC_UPLOAD_URL_TTL_SECS` - Presigned URL lifetime (default: 900)
//!
//! ## Integrations (optional)
//! - `WEATHER_API_KEY` - Weather provider key; unset serves the fixed report
//! - `WEATHER_CITY` - City for current conditions (default: Toronto)
//! - `WEATHER_BASE_URL` - Provider base (default: <https://api.openweathermap.org>)
//! - `SEAM_API_KEY` - Device platform key; unset reports devices unavailable
//! - `SEAM_BASE_URL` - Device platform base (default: <https://connect.getseam.com>)
//!
//! ## Error tracking
//! - `SENTRY_DSN`, `SENTRY_ENVIRONMENT`, `SENTRY_SAMPLE_RATE`,
//!   `SENTRY_TRACES_SAMPLE_RATE`
//!
//! ## TLS (optional)
//! - `HVAC_TLS_CERT` - PEM-encoded certificate chain
//! - `HVAC_TLS_KEY` - PEM-encoded private key

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use rand::Rng;
use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;
const MIN_UPLOAD_SECRET_LENGTH: usize = 32;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_UPLOAD_MAX_BYTES: usize = 5 * 1024 * 1024;
const DEFAULT_UPLOAD_URL_TTL_SECS: u64 = 900;
const DEFAULT_WEATHER_BASE_URL: &str = "https://api.openweathermap.org";
const DEFAULT_WEATHER_CITY: &str = "Toronto";
const DEFAULT_SEAM_BASE_URL: &str = "https://connect.getseam.com";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("expected `text` or `json`, got `{other}`")),
        }
    }
}

/// Dashboard server configuration.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// `PostgreSQL` connection URL (contains password). `None` selects the
    /// in-memory store.
    pub database_url: Option<SecretString>,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL, used to build presigned upload URLs
    pub public_url: String,
    /// Apply migrations at startup
    pub auto_migrate: bool,
    /// Log output format
    pub log_format: LogFormat,
    /// Browser origin allowed by CORS
    pub cors_origin: Option<String>,
    /// Logo upload configuration
    pub uploads: UploadConfig,
    /// Weather provider configuration
    pub weather: WeatherConfig,
    /// Device platform configuration
    pub devices: DeviceConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "staging", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
    /// TLS configuration for HTTPS (optional)
    pub tls: Option<TlsConfig>,
}

/// Presigned logo upload configuration.
///
/// Implements `Debug` manually to redact the signing key.
#[derive(Clone)]
pub struct UploadConfig {
    /// Directory objects are written to
    pub dir: PathBuf,
    /// HMAC-SHA256 key for upload URL signatures
    pub signing_key: SecretString,
    /// Largest accepted object
    pub max_bytes: usize,
    /// How long a presigned URL stays valid
    pub url_ttl: Duration,
}

impl std::fmt::Debug for UploadConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadConfig")
            .field("dir", &self.dir)
            .field("signing_key", &"[REDACTED]")
            .field("max_bytes", &self.max_bytes)
            .field("url_ttl", &self.url_ttl)
            .finish()
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("uploads"),
            signing_key: random_signing_key(),
            max_bytes: DEFAULT_UPLOAD_MAX_BYTES,
            url_ttl: Duration::from_secs(DEFAULT_UPLOAD_URL_TTL_SECS),
        }
    }
}

/// Weather provider configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct WeatherConfig {
    /// Provider API key. `None` serves the fixed report.
    pub api_key: Option<SecretString>,
    /// City queried for current conditions
    pub city: String,
    /// Provider base URL, without a trailing slash
    pub base_url: String,
}

impl std::fmt::Debug for WeatherConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("city", &self.city)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            city: DEFAULT_WEATHER_CITY.to_string(),
            base_url: DEFAULT_WEATHER_BASE_URL.to_string(),
        }
    }
}

/// Device platform configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct DeviceConfig {
    /// Platform API key. `None` reports the fleet as unavailable.
    pub api_key: Option<SecretString>,
    /// Platform base URL, without a trailing slash
    pub base_url: String,
}

impl std::fmt::Debug for DeviceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_SEAM_BASE_URL.to_string(),
        }
    }
}

/// TLS configuration for HTTPS.
#[derive(Clone)]
pub struct TlsConfig {
    /// PEM-encoded certificate chain
    pub cert_pem: String,
    /// PEM-encoded private key
    pub key_pem: SecretString,
}

impl std::fmt::Debug for TlsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TlsConfig")
            .field("cert_pem", &"[CERTIFICATE]")
            .field("key_pem", &"[REDACTED]")
            .finish()
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        let host = IpAddr::V4(Ipv4Addr::LOCALHOST);
        Self {
            database_url: None,
            host,
            port: DEFAULT_PORT,
            public_url: format!("http://{host}:{DEFAULT_PORT}"),
            auto_migrate: false,
            log_format: LogFormat::Text,
            cors_origin: None,
            uploads: UploadConfig::default(),
            weather: WeatherConfig::default(),
            devices: DeviceConfig::default(),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 1.0,
            tls: None,
        }
    }
}

/// Source of configuration values, keyed by variable name.
type Lookup<'a> = &'a dyn Fn(&str) -> Option<String>;

impl DashboardConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is invalid or if a supplied secret
    /// fails validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(&|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key/value source.
    ///
    /// # Errors
    ///
    /// See [`DashboardConfig::from_env`].
    pub fn from_lookup(env: Lookup<'_>) -> Result<Self, ConfigError> {
        let database_url = get_database_url(env);
        let host: IpAddr = parse_env_or_default(env, "HVAC_HOST", "127.0.0.1")?;
        let port: u16 = parse_env_or_default(env, "HVAC_PORT", "5000")?;
        let public_url = parse_base_url(
            "HVAC_PUBLIC_URL",
            &get_env_or_default(env, "HVAC_PUBLIC_URL", &format!("http://{host}:{port}")),
        )?;
        let auto_migrate = parse_bool(env, "HVAC_AUTO_MIGRATE")?;
        let log_format: LogFormat = parse_env_or_default(env, "HVAC_LOG_FORMAT", "text")?;
        let cors_origin = get_optional_env(env, "HVAC_CORS_ORIGIN");

        let uploads = UploadConfig::from_lookup(env)?;
        let weather = WeatherConfig::from_lookup(env)?;
        let devices = DeviceConfig::from_lookup(env)?;

        let sentry_dsn = get_optional_env(env, "SENTRY_DSN");
        let sentry_environment = get_optional_env(env, "SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env(env, "SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env(env, "SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let tls = TlsConfig::from_lookup(env)?;

        Ok(Self {
            database_url,
            host,
            port,
            public_url,
            auto_migrate,
            log_format,
            cors_origin,
            uploads,
            weather,
            devices,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
            tls,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl UploadConfig {
    fn from_lookup(env: Lookup<'_>) -> Result<Self, ConfigError> {
        let signing_key = match get_optional_env(env, "HVAC_UPLOAD_SECRET") {
            Some(secret) => {
                if secret.len() < MIN_UPLOAD_SECRET_LENGTH {
                    return Err(ConfigError::InsecureSecret(
                        "HVAC_UPLOAD_SECRET".to_string(),
                        format!(
                            "must be at least {MIN_UPLOAD_SECRET_LENGTH} characters (got {})",
                            secret.len()
                        ),
                    ));
                }
                validate_secret_strength(&secret, "HVAC_UPLOAD_SECRET")?;
                SecretString::from(secret)
            }
            None => random_signing_key(),
        };

        Ok(Self {
            dir: PathBuf::from(get_env_or_default(env, "HVAC_UPLOAD_DIR", "uploads")),
            signing_key,
            max_bytes: parse_env_or_default(
                env,
                "HVAC_UPLOAD_MAX_BYTES",
                &DEFAULT_UPLOAD_MAX_BYTES.to_string(),
            )?,
            url_ttl: Duration::from_secs(parse_env_or_default(
                env,
                "HVAC_UPLOAD_URL_TTL_SECS",
                &DEFAULT_UPLOAD_URL_TTL_SECS.to_string(),
            )?),
        })
    }
}

impl WeatherConfig {
    fn from_lookup(env: Lookup<'_>) -> Result<Self, ConfigError> {
        let api_key = get_optional_env(env, "WEATHER_API_KEY").map(|key| {
            if let Err(e) = validate_secret_strength(&key, "WEATHER_API_KEY") {
                tracing::warn!("WEATHER_API_KEY validation warning: {e}");
            }
            SecretString::from(key)
        });

        Ok(Self {
            api_key,
            city: get_env_or_default(env, "WEATHER_CITY", DEFAULT_WEATHER_CITY),
            base_url: parse_base_url(
                "WEATHER_BASE_URL",
                &get_env_or_default(env, "WEATHER_BASE_URL", DEFAULT_WEATHER_BASE_URL),
            )?,
        })
    }
}

impl DeviceConfig {
    fn from_lookup(env: Lookup<'_>) -> Result<Self, ConfigError> {
        let api_key = get_optional_env(env, "SEAM_API_KEY").map(|key| {
            if let Err(e) = validate_secret_strength(&key, "SEAM_API_KEY") {
                tracing::warn!("SEAM_API_KEY validation warning: {e}");
            }
            SecretString::from(key)
        });

        Ok(Self {
            api_key,
            base_url: parse_base_url(
                "SEAM_BASE_URL",
                &get_env_or_default(env, "SEAM_BASE_URL", DEFAULT_SEAM_BASE_URL),
            )?,
        })
    }
}

impl TlsConfig {
    fn from_lookup(env: Lookup<'_>) -> Result<Option<Self>, ConfigError> {
        let cert_pem = get_optional_env(env, "HVAC_TLS_CERT");
        let key_pem = get_optional_env(env, "HVAC_TLS_KEY");

        match (cert_pem, key_pem) {
            (Some(cert), Some(key)) => Ok(Some(Self {
                cert_pem: cert,
                key_pem: SecretString::from(key),
            })),
            (None, None) => Ok(None),
            _ => Err(ConfigError::InvalidEnvVar(
                "HVAC_TLS_*".to_string(),
                "Both HVAC_TLS_CERT and HVAC_TLS_KEY must be set together".to_string(),
            )),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get database URL, preferring the generic `DATABASE_URL` (used by platform
/// Postgres attach) over `HVAC_DATABASE_URL`.
fn get_database_url(env: Lookup<'_>) -> Option<SecretString> {
    get_optional_env(env, "DATABASE_URL")
        .or_else(|| get_optional_env(env, "HVAC_DATABASE_URL"))
        .map(SecretString::from)
}

/// Get an optional environment variable. Empty values count as unset.
fn get_optional_env(env: Lookup<'_>, key: &str) -> Option<String> {
    env(key).filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(env: Lookup<'_>, key: &str, default: &str) -> String {
    get_optional_env(env, key).unwrap_or_else(|| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env_or_default<T>(env: Lookup<'_>, key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(env, key, default)
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

fn parse_bool(env: Lookup<'_>, key: &str) -> Result<bool, ConfigError> {
    match get_optional_env(env, key) {
        None => Ok(false),
        Some(v) => match v.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => Err(ConfigError::InvalidEnvVar(
                key.to_string(),
                format!("expected a boolean, got `{other}`"),
            )),
        },
    }
}

/// Validate an absolute URL and strip any trailing slash so paths can be
/// appended with `format!("{base}/path")`.
fn parse_base_url(key: &str, raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    Url::parse(trimmed).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    Ok(trimmed.to_string())
}

/// A process-lifetime signing key for when none is configured.
fn random_signing_key() -> SecretString {
    let bytes: [u8; 32] = rand::rng().random();
    SecretString::from(hex::encode(bytes))
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}
