//! HVAC dashboard server library.
//!
//! JSON API behind the dashboard, leads, pricing and settings views, plus
//! server-side proxies for the weather and device platforms. Exposed as a
//! library so the CLI and the integration tests can drive the same store and
//! router as the binary.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

pub use config::DashboardConfig;
pub use db::Database;
pub use routes::build_router;
pub use state::AppState;
