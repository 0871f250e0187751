//! Grant program repository.

use sqlx::PgPool;
use tracing::instrument;

use hvac_dash_core::GrantId;

use super::RepositoryError;
use crate::models::{Grant, NewGrant};

#[derive(Debug, sqlx::FromRow)]
struct GrantRow {
    id: i32,
    program_name: String,
    description: Option<String>,
    eligible_count: i32,
    active_count: i32,
    avg_grant_value: i32,
}

impl From<GrantRow> for Grant {
    fn from(row: GrantRow) -> Self {
        Self {
            id: GrantId::new(row.id),
            program_name: row.program_name,
            description: row.description,
            eligible_count: row.eligible_count,
            active_count: row.active_count,
            avg_grant_value: row.avg_grant_value,
        }
    }
}

/// Repository for grant programs.
pub struct GrantRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> GrantRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all grant programs in ascending id order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Grant>, RepositoryError> {
        let rows = sqlx::query_as::<_, GrantRow>(
            "SELECT id, program_name, description, eligible_count, active_count, avg_grant_value \
             FROM grants ORDER BY id",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Insert a grant program.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    #[instrument(skip(self, grant), fields(program = %grant.program_name))]
    pub async fn create(&self, grant: NewGrant) -> Result<Grant, RepositoryError> {
        let row = sqlx::query_as::<_, GrantRow>(
            "INSERT INTO grants (program_name, description, eligible_count, active_count, avg_grant_value) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, program_name, description, eligible_count, active_count, avg_grant_value",
        )
        .bind(grant.program_name)
        .bind(grant.description)
        .bind(grant.eligible_count)
        .bind(grant.active_count)
        .bind(grant.avg_grant_value)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }
}
