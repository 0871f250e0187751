//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! hvac-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (or `HVAC_DATABASE_URL`) - `PostgreSQL` connection string
//!
//! Migrations are embedded from `crates/server/migrations/`.

use super::{CliError, connect};

/// Run all pending migrations.
///
/// # Errors
///
/// Returns an error if `DATABASE_URL` is unset or a migration fails.
pub async fn run() -> Result<(), CliError> {
    let db = connect().await?;

    tracing::info!("Running migrations...");
    db.migrate().await?;
    db.close().await;

    tracing::info!("Migrations complete!");
    Ok(())
}
