//! User management commands.
//!
//! # Usage
//!
//! ```bash
//! hvac-cli user create -u dispatch -p 'furnace-filter-42' -r technician
//! ```

use hvac_dash_core::UserRole;
use hvac_dash_server::services::AccountService;

use super::{CliError, connect};

/// Create a user and log its id.
///
/// # Errors
///
/// Returns an error for an invalid username, a short password, a taken
/// username, or a database failure.
pub async fn create(username: &str, password: &str, role: UserRole) -> Result<(), CliError> {
    let db = connect().await?;

    tracing::info!("Creating user: {} ({})", username, role);
    let result = AccountService::new(&db)
        .create_user(username, password, role)
        .await;
    db.close().await;

    let user = result?;
    tracing::info!("User created with id {}", user.id);
    Ok(())
}
