//! Server-side proxies for the weather and device platforms.
//!
//! Both always answer 200; upstream problems show up as "no data" in the
//! payload.

use axum::{Json, Router, extract::State, routing::get};
use tracing::instrument;

use crate::services::{DeviceFleet, WeatherReport};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/weather", get(weather))
        .route("/api/devices", get(devices))
}

#[instrument(skip(state))]
async fn weather(State(state): State<AppState>) -> Json<WeatherReport> {
    Json(state.weather().current().await)
}

#[instrument(skip(state))]
async fn devices(State(state): State<AppState>) -> Json<DeviceFleet> {
    Json(state.devices().fleet().await)
}
