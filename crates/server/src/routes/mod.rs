//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                    - Liveness
//! GET    /health/ready              - Store readiness
//!
//! # Settings (singleton)
//! GET    /api/settings              - Stored settings or defaults
//! PATCH  /api/settings              - Partial update (upsert)
//!
//! # Leads
//! GET    /api/leads?search=         - List, optionally filtered
//! POST   /api/leads                 - Create (201)
//! PATCH  /api/leads/{id}            - Partial update (404 if missing)
//! DELETE /api/leads/{id}            - Delete (204)
//!
//! # Read-only and aggregate views
//! GET    /api/grants                - Grant programs
//! GET    /api/dashboard             - Widget summary
//! GET    /api/roi                   - ROI projection
//! GET    /api/pricing               - Pricing tiers
//!
//! # Third-party proxies
//! GET    /api/weather               - Weather and grid load
//! GET    /api/devices               - Device fleet
//!
//! # Logo uploads
//! POST   /api/uploads/request-url   - Presigned upload URL
//! PUT    /api/uploads/{objectId}    - Signed upload target
//! GET    /objects/uploads/*         - Stored objects
//! ```

pub mod dashboard;
pub mod extract;
pub mod grants;
pub mod health;
pub mod integrations;
pub mod leads;
pub mod settings;
pub mod uploads;

use std::path::Path;

use axum::{
    Router,
    http::{HeaderValue, Method, header},
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeader;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::services::uploads::OBJECT_PATH_PREFIX;
use crate::state::AppState;

/// Stored objects are user supplied, so scripts inside them (SVG) must not
/// run on the API origin.
const OBJECT_CSP: &str = "default-src 'none'; style-src 'unsafe-inline'; sandbox";

type ObjectService = SetResponseHeader<
    SetResponseHeader<SetResponseHeader<ServeDir, HeaderValue>, HeaderValue>,
    HeaderValue,
>;

/// Static file service for uploaded objects.
fn object_service(dir: &Path) -> ObjectService {
    let files = ServeDir::new(dir);
    let files = SetResponseHeader::overriding(
        files,
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    let files = SetResponseHeader::overriding(
        files,
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static(OBJECT_CSP),
    );
    SetResponseHeader::overriding(
        files,
        header::CONTENT_DISPOSITION,
        HeaderValue::from_static("inline"),
    )
}

/// All API routes, without middleware.
pub fn routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(settings::router())
        .merge(leads::router())
        .merge(grants::router())
        .merge(dashboard::router())
        .merge(integrations::router())
        .merge(uploads::router(max_upload_bytes))
}

/// Build the application: routes, static objects, tracing, CORS and Sentry.
pub fn build_router(state: AppState) -> Router {
    let objects = object_service(state.uploads().dir());
    let cors = cors_layer(state.config().cors_origin.as_deref());

    Router::new()
        .merge(routes(state.uploads().max_bytes()))
        .nest_service(OBJECT_PATH_PREFIX, objects)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .layer(cors)
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

/// CORS for a separately served UI. Without a configured origin no
/// cross-origin requests are allowed.
fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let allow_origin = origin
        .and_then(|o| match HeaderValue::from_str(o) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin = o, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .map_or_else(|| AllowOrigin::list(Vec::<HeaderValue>::new()), AllowOrigin::exact);

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE])
}
