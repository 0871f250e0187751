//! Subcommand implementations.

pub mod migrate;
pub mod roi;
pub mod seed;
pub mod user;

use thiserror::Error;

use hvac_dash_server::config::{ConfigError, DashboardConfig};
use hvac_dash_server::db::{Database, RepositoryError};
use hvac_dash_server::services::AccountError;

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Command needs a `PostgreSQL` database.
    #[error("DATABASE_URL is not set")]
    MissingDatabaseUrl,

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("{0}")]
    Account(#[from] AccountError),

    #[error("{0}")]
    InvalidArgument(String),
}

/// Connect to the configured `PostgreSQL` database.
///
/// The in-memory store is never used here: changes made to it would vanish
/// when the command exits.
async fn connect() -> Result<Database, CliError> {
    let config = DashboardConfig::from_env()?;
    let url = config
        .database_url
        .as_ref()
        .ok_or(CliError::MissingDatabaseUrl)?;

    tracing::info!("Connecting to database...");
    Ok(Database::connect(Some(url)).await?)
}
