//! Demo fixtures inserted into empty tables at startup.
//!
//! Each table is seeded independently and only while it is empty, so running
//! the seed repeatedly never duplicates rows or overwrites edits.

use serde::Serialize;
use tracing::instrument;

use super::{Database, RepositoryError};
use crate::models::{NewGrant, NewLead, SettingsPatch};

/// What a seed run inserted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedReport {
    pub settings_inserted: bool,
    pub leads_inserted: usize,
    pub grants_inserted: usize,
}

impl SeedReport {
    /// Whether anything was written.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        !self.settings_inserted && self.leads_inserted == 0 && self.grants_inserted == 0
    }
}

/// Settings row written on first startup.
#[must_use]
pub fn seed_settings() -> SettingsPatch {
    SettingsPatch {
        company_name: Some("Toronto HVAC Solutions".to_string()),
        truck_roll_cost: Some(250),
        energy_waste_cost: Some(1200),
        currency: Some("CAD".to_string()),
        theme: Some("navy".to_string()),
        ..SettingsPatch::default()
    }
}

/// Demo leads across the four GTA territories.
#[must_use]
pub fn seed_leads() -> Vec<NewLead> {
    [
        (
            "Fairview Mall Complex",
            "1800 Sheppard Ave E, North York",
            "Scarborough-South",
            "Trane IntelliPak",
            85,
            "Compressor Vibration",
            "New",
        ),
        (
            "Vaughan Mills Retail",
            "1 Bass Pro Mills Dr, Vaughan",
            "Vaughan-East",
            "Carrier Weathermaster",
            45,
            "Belt Tension",
            "Service Scheduled",
        ),
        (
            "Etobicoke General Hospital",
            "101 Humber College Blvd, Etobicoke",
            "Etobicoke-Central",
            "Lennox Strategos",
            92,
            "Refrigerant Leak",
            "Contacted",
        ),
        (
            "RBC Plaza",
            "200 Bay St, Toronto",
            "Downtown Core",
            "Daikin Rebel",
            12,
            "None",
            "New",
        ),
    ]
    .into_iter()
    .map(
        |(name, address, territory, unit_model, risk_score, predicted_failure, status)| NewLead {
            unit_model: Some(unit_model.to_string()),
            risk_score: Some(risk_score),
            predicted_failure: Some(predicted_failure.to_string()),
            status: Some(status.to_string()),
            ..NewLead::new(name, address, territory)
        },
    )
    .collect()
}

/// Rebate programs shown in the grants widget.
#[must_use]
pub fn seed_grants() -> Vec<NewGrant> {
    [
        (
            "Enbridge Home Efficiency Rebate",
            "Rebates for high-efficiency furnace upgrades",
            142,
            28,
            2400,
        ),
        (
            "Canada Greener Homes Grant",
            "Federal grant for heat pump installation",
            89,
            15,
            5000,
        ),
        (
            "IESO Retrofit Program",
            "Commercial HVAC controls upgrade incentives",
            34,
            8,
            12_500,
        ),
    ]
    .into_iter()
    .map(
        |(program_name, description, eligible_count, active_count, avg_grant_value)| NewGrant {
            program_name: program_name.to_string(),
            description: Some(description.to_string()),
            eligible_count,
            active_count,
            avg_grant_value,
        },
    )
    .collect()
}

/// Insert the demo fixtures into whichever tables are empty.
///
/// # Errors
///
/// Returns `RepositoryError` if any read or insert fails. Tables seeded before
/// the failure keep their rows.
#[instrument(skip(db), fields(driver = db.driver()))]
pub async fn seed_data(db: &Database) -> Result<SeedReport, RepositoryError> {
    let mut report = SeedReport::default();

    if db.get_settings().await?.is_none() {
        db.update_settings(&seed_settings()).await?;
        report.settings_inserted = true;
    }

    if db.get_leads().await?.is_empty() {
        for lead in seed_leads() {
            db.create_lead(lead).await?;
            report.leads_inserted += 1;
        }
    }

    if db.get_grants().await?.is_empty() {
        for grant in seed_grants() {
            db.insert_grant(grant).await?;
            report.grants_inserted += 1;
        }
    }

    if report.is_empty() {
        tracing::debug!("Seed skipped, all tables already populated");
    } else {
        tracing::info!(
            settings = report.settings_inserted,
            leads = report.leads_inserted,
            grants = report.grants_inserted,
            "Seeded demo data"
        );
    }

    Ok(report)
}
