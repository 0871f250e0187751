//! Seed empty tables with the demo settings, leads and grants.

use hvac_dash_server::db::seed_data;

use super::{CliError, connect};

/// Run the idempotent seed routine and log what it inserted.
///
/// # Errors
///
/// Returns an error if `DATABASE_URL` is unset or a write fails.
pub async fn run() -> Result<(), CliError> {
    let db = connect().await?;

    let report = seed_data(&db).await?;
    db.close().await;

    if report.is_empty() {
        tracing::info!("All tables already populated, nothing to seed");
    } else {
        tracing::info!("Seeding complete!");
        tracing::info!("  Settings inserted: {}", report.settings_inserted);
        tracing::info!("  Leads inserted: {}", report.leads_inserted);
        tracing::info!("  Grants inserted: {}", report.grants_inserted);
    }

    Ok(())
}
