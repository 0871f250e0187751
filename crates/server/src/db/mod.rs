//! Data access for the dashboard store.
//!
//! # Drivers
//!
//! - [`Database::Postgres`] - `PostgreSQL` via a sqlx pool
//! - [`Database::Reference`] - in-memory store for local development and tests
//!
//! Both drivers expose the same operations through [`Database`]; callers never
//! match on the variant.
//!
//! # Tables
//!
//! - `users` - dashboard accounts (Argon2id password hashes)
//! - `settings` - branding and ROI assumptions, singleton row `id = 1`
//! - `leads` - sales and service opportunities
//! - `grants` - rebate programs (seeded, read-only from the API)
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p hvac-dash-cli -- migrate
//! ```

pub mod grants;
pub mod leads;
pub mod reference;
pub mod seed;
pub mod settings;
pub mod users;

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use hvac_dash_core::{LeadId, UserId};

pub use grants::GrantRepository;
pub use leads::LeadRepository;
pub use reference::ReferenceDb;
pub use seed::{SeedReport, seed_data};
pub use settings::SettingsRepository;
pub use users::UserRepository;

use crate::models::{Grant, Lead, LeadPatch, NewGrant, NewLead, NewUser, Settings, SettingsPatch, User};

/// Embedded migrations from `crates/server/migrations`.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration failed.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique username).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Apply pending migrations.
///
/// # Errors
///
/// Returns `RepositoryError::Migration` if a migration fails to apply.
pub async fn run_migrations(pool: &PgPool) -> Result<(), RepositoryError> {
    MIGRATOR.run(pool).await?;
    Ok(())
}

/// `PostgreSQL` driver: a pool plus per-table repositories.
#[derive(Debug, Clone)]
pub struct PgDatabase {
    pool: PgPool,
}

impl PgDatabase {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    #[must_use]
    pub const fn settings(&self) -> SettingsRepository<'_> {
        SettingsRepository::new(&self.pool)
    }

    #[must_use]
    pub const fn leads(&self) -> LeadRepository<'_> {
        LeadRepository::new(&self.pool)
    }

    #[must_use]
    pub const fn grants(&self) -> GrantRepository<'_> {
        GrantRepository::new(&self.pool)
    }

    #[must_use]
    pub const fn users(&self) -> UserRepository<'_> {
        UserRepository::new(&self.pool)
    }
}

/// Handle to the dashboard store.
#[derive(Debug, Clone)]
pub enum Database {
    /// `PostgreSQL` database
    Postgres(PgDatabase),
    /// In-memory database
    Reference(ReferenceDb),
}

impl Database {
    /// Open the store: `PostgreSQL` when a URL is given, otherwise in-memory.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the pool cannot connect.
    pub async fn connect(database_url: Option<&SecretString>) -> Result<Self, RepositoryError> {
        match database_url {
            Some(url) => {
                let pool = create_pool(url).await?;
                Ok(Self::Postgres(PgDatabase::new(pool)))
            }
            None => Ok(Self::Reference(ReferenceDb::default())),
        }
    }

    /// Short driver name for logs.
    #[must_use]
    pub const fn driver(&self) -> &'static str {
        match self {
            Self::Postgres(_) => "postgres",
            Self::Reference(_) => "reference",
        }
    }

    /// Apply pending migrations. The in-memory store has none.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Migration` if a migration fails.
    pub async fn migrate(&self) -> Result<(), RepositoryError> {
        match self {
            Self::Postgres(db) => run_migrations(db.pool()).await,
            Self::Reference(_) => Ok(()),
        }
    }

    /// Readiness check.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the store is unreachable.
    pub async fn ping(&self) -> Result<(), RepositoryError> {
        match self {
            Self::Postgres(db) => {
                sqlx::query("SELECT 1").execute(db.pool()).await?;
                Ok(())
            }
            Self::Reference(_) => Ok(()),
        }
    }

    /// Close the store. Further queries on a closed pool fail.
    pub async fn close(&self) {
        match self {
            Self::Postgres(db) => db.pool().close().await,
            Self::Reference(_) => {}
        }
    }

    // -------------------------------------------------------------------------
    // Settings
    // -------------------------------------------------------------------------

    /// The settings row, if one has been written.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_settings(&self) -> Result<Option<Settings>, RepositoryError> {
        match self {
            Self::Postgres(db) => db.settings().get().await,
            Self::Reference(db) => Ok(db.get_settings().await),
        }
    }

    /// Apply `patch` to the settings row, creating it from column defaults
    /// first if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update_settings(&self, patch: &SettingsPatch) -> Result<Settings, RepositoryError> {
        match self {
            Self::Postgres(db) => db.settings().upsert(patch).await,
            Self::Reference(db) => Ok(db.update_settings(patch).await),
        }
    }

    // -------------------------------------------------------------------------
    // Leads
    // -------------------------------------------------------------------------

    /// All leads in ascending id order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_leads(&self) -> Result<Vec<Lead>, RepositoryError> {
        match self {
            Self::Postgres(db) => db.leads().list().await,
            Self::Reference(db) => Ok(db.get_leads().await),
        }
    }

    /// Insert a lead and return it with its generated id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create_lead(&self, lead: NewLead) -> Result<Lead, RepositoryError> {
        match self {
            Self::Postgres(db) => db.leads().create(lead).await,
            Self::Reference(db) => Ok(db.create_lead(lead).await),
        }
    }

    /// Apply `patch` to an existing lead.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no lead has this id.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update_lead(&self, id: LeadId, patch: &LeadPatch) -> Result<Lead, RepositoryError> {
        match self {
            Self::Postgres(db) => db.leads().update(id, patch).await,
            Self::Reference(db) => db.update_lead(id, patch).await,
        }
    }

    /// Delete a lead. Deleting a missing id is not an error.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_lead(&self, id: LeadId) -> Result<(), RepositoryError> {
        match self {
            Self::Postgres(db) => db.leads().delete(id).await,
            Self::Reference(db) => {
                db.delete_lead(id).await;
                Ok(())
            }
        }
    }

    // -------------------------------------------------------------------------
    // Grants
    // -------------------------------------------------------------------------

    /// All grant programs in ascending id order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_grants(&self) -> Result<Vec<Grant>, RepositoryError> {
        match self {
            Self::Postgres(db) => db.grants().list().await,
            Self::Reference(db) => Ok(db.get_grants().await),
        }
    }

    /// Insert a grant program.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert_grant(&self, grant: NewGrant) -> Result<Grant, RepositoryError> {
        match self {
            Self::Postgres(db) => db.grants().create(grant).await,
            Self::Reference(db) => Ok(db.insert_grant(grant).await),
        }
    }

    // -------------------------------------------------------------------------
    // Users
    // -------------------------------------------------------------------------

    /// Look up a user by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_user(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        match self {
            Self::Postgres(db) => db.users().get_by_id(id).await,
            Self::Reference(db) => Ok(db.get_user(id).await),
        }
    }

    /// Look up a user by username.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        match self {
            Self::Postgres(db) => db.users().get_by_username(username).await,
            Self::Reference(db) => Ok(db.get_user_by_username(username).await),
        }
    }

    /// Create a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the username is taken.
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create_user(&self, user: NewUser) -> Result<User, RepositoryError> {
        match self {
            Self::Postgres(db) => db.users().create(user).await,
            Self::Reference(db) => db.create_user(user).await,
        }
    }
}
