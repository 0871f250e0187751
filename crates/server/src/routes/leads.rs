//! Lead (CRM) routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
};
use serde::Deserialize;
use tracing::instrument;

use hvac_dash_core::{LeadId, SearchTerm};

use crate::db::RepositoryError;
use crate::error::AppError;
use crate::models::{CreateLeadInput, Lead, LeadPatch};
use crate::state::AppState;

use super::extract::ValidatedJson;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/leads", get(list_leads).post(create_lead))
        .route("/api/leads/{id}", patch(update_lead).delete(delete_lead))
}

#[derive(Debug, Default, Deserialize)]
pub struct LeadsQuery {
    /// Case-insensitive substring of name or address.
    pub search: Option<String>,
}

#[instrument(skip(state))]
async fn list_leads(
    State(state): State<AppState>,
    Query(query): Query<LeadsQuery>,
) -> Result<Json<Vec<Lead>>, AppError> {
    let mut leads = state.db().get_leads().await?;

    if let Some(search) = query.search.as_deref() {
        let term = SearchTerm::new(search);
        leads.retain(|lead| lead.matches_search(&term));
    }

    Ok(Json(leads))
}

#[instrument(skip(state))]
async fn create_lead(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateLeadInput>,
) -> Result<(StatusCode, Json<Lead>), AppError> {
    let lead = state.db().create_lead(input.into_new_lead()).await?;
    tracing::info!(lead_id = %lead.id, "Lead created");
    Ok((StatusCode::CREATED, Json(lead)))
}

#[instrument(skip(state))]
async fn update_lead(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(patch): ValidatedJson<LeadPatch>,
) -> Result<Json<Lead>, AppError> {
    let lead = state
        .db()
        .update_lead(LeadId::new(id), &patch)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("Lead not found".to_string()),
            other => other.into(),
        })?;
    Ok(Json(lead))
}

/// Always 204, whether or not the lead existed.
#[instrument(skip(state))]
async fn delete_lead(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    state.db().delete_lead(LeadId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
