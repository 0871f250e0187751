//! Aggregate views: dashboard summary, ROI projection and pricing tiers.

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use serde::Deserialize;
use tracing::instrument;

use hvac_dash_core::RoiAssumptions;

use crate::error::AppError;
use crate::models::{DashboardSummary, PricingTier, RoiReport, Settings};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/dashboard", get(dashboard))
        .route("/api/roi", get(roi))
        .route("/api/pricing", get(pricing))
}

/// `GET /api/roi` query. Missing values come from settings.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoiQuery {
    pub truck_roll_cost: Option<i64>,
    pub energy_waste: Option<i64>,
}

async fn current_settings(state: &AppState) -> Result<Settings, AppError> {
    Ok(state
        .db()
        .get_settings()
        .await?
        .unwrap_or_else(Settings::fallback))
}

#[instrument(skip(state))]
async fn dashboard(State(state): State<AppState>) -> Result<Json<DashboardSummary>, AppError> {
    let settings = current_settings(&state).await?;
    let leads = state.db().get_leads().await?;
    let grants = state.db().get_grants().await?;

    Ok(Json(DashboardSummary::build(&leads, &grants, &settings)))
}

#[instrument(skip(state))]
async fn roi(
    State(state): State<AppState>,
    Query(query): Query<RoiQuery>,
) -> Result<Json<RoiReport>, AppError> {
    if let Some(cost) = query.truck_roll_cost.filter(|c| *c < 0) {
        return Err(AppError::validation(
            "truckRollCost",
            format!("Truck roll cost cannot be negative, got {cost}"),
        ));
    }
    if let Some(waste) = query.energy_waste.filter(|w| *w < 0) {
        return Err(AppError::validation(
            "energyWaste",
            format!("Energy waste cannot be negative, got {waste}"),
        ));
    }

    let settings = current_settings(&state).await?;
    let stored = RoiReport::from_settings(&settings);

    let report = match (query.truck_roll_cost, query.energy_waste) {
        (None, None) => stored,
        (truck_roll, energy_waste) => {
            let assumptions = RoiAssumptions {
                truck_roll_cost: truck_roll
                    .map_or(stored.assumptions.truck_roll_cost, Into::into),
                energy_waste_cost: energy_waste
                    .map_or(stored.assumptions.energy_waste_cost, Into::into),
            };
            RoiReport::new(assumptions, stored.currency)
        }
    };

    Ok(Json(report))
}

async fn pricing() -> Json<Vec<PricingTier>> {
    Json(PricingTier::all())
}
