//! Energy-efficiency grant programs (read-only).

use axum::{Json, Router, extract::State, routing::get};
use tracing::instrument;

use crate::error::AppError;
use crate::models::Grant;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/grants", get(list_grants))
}

#[instrument(skip(state))]
async fn list_grants(State(state): State<AppState>) -> Result<Json<Vec<Grant>>, AppError> {
    Ok(Json(state.db().get_grants().await?))
}
