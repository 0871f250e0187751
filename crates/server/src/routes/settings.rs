//! Branding and ROI-assumption settings.

use axum::{Json, Router, extract::State, routing::get};
use tracing::instrument;

use crate::error::AppError;
use crate::models::{Settings, SettingsPatch};
use crate::state::AppState;

use super::extract::ValidatedJson;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/settings", get(get_settings).patch(update_settings))
}

/// The stored settings, or the built-in defaults before the first write.
#[instrument(skip(state))]
async fn get_settings(State(state): State<AppState>) -> Result<Json<Settings>, AppError> {
    let settings = state
        .db()
        .get_settings()
        .await?
        .unwrap_or_else(Settings::fallback);
    Ok(Json(settings))
}

/// Apply a partial update, creating the row if it does not exist yet.
#[instrument(skip(state))]
async fn update_settings(
    State(state): State<AppState>,
    ValidatedJson(patch): ValidatedJson<SettingsPatch>,
) -> Result<Json<Settings>, AppError> {
    let settings = state.db().update_settings(&patch).await?;
    tracing::info!(fields = ?patch.columns(), "Settings updated");
    Ok(Json(settings))
}
