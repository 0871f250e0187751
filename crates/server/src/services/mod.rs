//! Business logic and third-party integrations.
//!
//! # Services
//!
//! - `accounts` - User creation with Argon2id password hashing
//! - `devices` - Device platform proxy (thermostats, sensors)
//! - `uploads` - Presigned logo uploads
//! - `weather` - Weather proxy with grid load and HVAC impact

pub mod accounts;
pub mod devices;
pub mod uploads;
pub mod weather;

pub use accounts::{AccountError, AccountService};
pub use devices::{Device, DeviceError, DeviceFleet, DeviceService};
pub use uploads::{PresignedUpload, SignedUploadParams, UploadError, UploadService, UploadUrlRequest};
pub use weather::{GridLoad, HvacImpact, WeatherError, WeatherReport, WeatherService};
