//! Presigned logo upload routes.
//!
//! ```text
//! POST /api/uploads/request-url  - Issue a signed upload URL
//! PUT  /api/uploads/{objectId}   - Signed upload target
//! ```

use axum::{
    Json, Router,
    body::Bytes,
    extract::{DefaultBodyLimit, Path, Query, State},
    http::{HeaderMap, header},
    routing::{post, put},
};
use chrono::Utc;
use serde::Serialize;
use tracing::instrument;

use crate::error::AppError;
use crate::services::{PresignedUpload, SignedUploadParams, UploadUrlRequest};
use crate::state::AppState;

use super::extract::ValidatedJson;

/// Build the upload router. The PUT body limit follows the configured
/// maximum object size.
pub fn router(max_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/api/uploads/request-url", post(request_upload_url))
        .route(
            "/api/uploads/{object_id}",
            put(upload_object).layer(DefaultBodyLimit::max(max_bytes)),
        )
}

/// `PUT /api/uploads/{objectId}` response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedObject {
    pub object_path: String,
}

#[instrument(skip(state))]
async fn request_upload_url(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<UploadUrlRequest>,
) -> Result<Json<PresignedUpload>, AppError> {
    let presigned = state.uploads().presign(&request, Utc::now())?;
    Ok(Json(presigned))
}

#[instrument(skip(state, headers, body), fields(len = body.len()))]
async fn upload_object(
    State(state): State<AppState>,
    Path(object_id): Path<String>,
    Query(params): Query<SignedUploadParams>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<UploadedObject>, AppError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());

    let uploads = state.uploads();
    uploads.verify(&object_id, &params, content_type, Utc::now())?;
    let object_path = uploads.store(&object_id, &body).await?;

    Ok(Json(UploadedObject { object_path }))
}
