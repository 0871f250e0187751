//! Weather and device-platform proxies against fake upstreams.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::{
    Json, Router,
    http::{HeaderMap, StatusCode, header},
    routing::{get, post},
};
use secrecy::SecretString;
use serde_json::{Value, json};

use hvac_dash_integration_tests::{TestApp, spawn_fake};

async fn get_json(app: &TestApp, path: &str) -> Value {
    let resp = app.client.get(app.url(path)).send().await.unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::OK);
    resp.json().await.unwrap()
}

#[tokio::test]
async fn test_weather_mock_without_key() {
    let app = TestApp::spawn().await;

    let weather = get_json(&app, "/api/weather").await;
    assert_eq!(
        weather,
        json!({
            "temp": -2,
            "condition": "Partly Cloudy",
            "gridLoad": "Moderate",
            "hvacImpact": "Heating Demand High"
        })
    );
}

#[tokio::test]
async fn test_weather_from_provider_is_cached() {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);
    let provider = spawn_fake(Router::new().route(
        "/data/2.5/weather",
        get(move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Json(json!({
                    "main": {"temp": 27.6},
                    "weather": [{"main": "Clear", "description": "clear sky"}]
                }))
            }
        }),
    ))
    .await;

    let app = TestApp::spawn_with(|config| {
        config.weather.api_key = Some(SecretString::from("test-weather-key"));
        config.weather.base_url = provider;
    })
    .await;

    let first = get_json(&app, "/api/weather").await;
    assert_eq!(first["temp"], 28);
    assert_eq!(first["condition"], "Clear Sky");
    assert_eq!(first["gridLoad"], "Moderate");
    assert_eq!(first["hvacImpact"], "Cooling Demand High");

    let second = get_json(&app, "/api/weather").await;
    assert_eq!(first, second);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_weather_upstream_failure_is_no_data() {
    let provider = spawn_fake(Router::new().route(
        "/data/2.5/weather",
        get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    ))
    .await;

    let app = TestApp::spawn_with(|config| {
        config.weather.api_key = Some(SecretString::from("test-weather-key"));
        config.weather.base_url = provider;
    })
    .await;

    let weather = get_json(&app, "/api/weather").await;
    assert!(weather["temp"].is_null());
    assert!(weather["condition"].is_null());
    assert!(weather["gridLoad"].is_null());
    assert!(weather["hvacImpact"].is_null());
}

#[tokio::test]
async fn test_devices_unavailable_without_key() {
    let app = TestApp::spawn().await;

    let fleet = get_json(&app, "/api/devices").await;
    assert_eq!(fleet["available"], false);
    assert_eq!(fleet["devices"], json!([]));
}

#[tokio::test]
async fn test_devices_from_platform() {
    let platform = spawn_fake(Router::new().route(
        "/devices/list",
        post(|headers: HeaderMap| async move {
            let authorized = headers
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                == Some("Bearer test-seam-key");
            if !authorized {
                return Err(StatusCode::UNAUTHORIZED);
            }
            Ok(Json(json!({
                "devices": [
                    {"device_id": "t-1", "device_type": "ecobee_thermostat",
                     "display_name": "Lobby", "properties": {"online": true}},
                    {"device_id": "t-2", "device_type": "nest_thermostat",
                     "properties": {"online": false, "name": "Roof RTU-2"}}
                ]
            })))
        }),
    ))
    .await;

    let app = TestApp::spawn_with(|config| {
        config.devices.api_key = Some(SecretString::from("test-seam-key"));
        config.devices.base_url = platform;
    })
    .await;

    let fleet = get_json(&app, "/api/devices").await;
    assert_eq!(fleet["available"], true);
    assert_eq!(fleet["online"], 1);
    assert_eq!(fleet["offline"], 1);
    assert_eq!(fleet["devices"][0]["deviceId"], "t-1");
    assert_eq!(fleet["devices"][0]["name"], "Lobby");
    assert_eq!(fleet["devices"][1]["name"], "Roof RTU-2");
}

#[tokio::test]
async fn test_devices_rejected_key_is_unavailable() {
    let platform = spawn_fake(Router::new().route(
        "/devices/list",
        post(|| async { StatusCode::UNAUTHORIZED }),
    ))
    .await;

    let app = TestApp::spawn_with(|config| {
        config.devices.api_key = Some(SecretString::from("revoked-key"));
        config.devices.base_url = platform;
    })
    .await;

    let fleet = get_json(&app, "/api/devices").await;
    assert_eq!(fleet["available"], false);
}
