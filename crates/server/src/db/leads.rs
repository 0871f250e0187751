//! Lead repository.

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;

use hvac_dash_core::LeadId;

use super::RepositoryError;
use crate::models::{Lead, LeadPatch, NewLead};

const LEAD_COLUMNS: &str = "id, name, address, territory, unit_model, risk_score, \
                            predicted_failure, status, last_contact";

#[derive(Debug, sqlx::FromRow)]
struct LeadRow {
    id: i32,
    name: String,
    address: String,
    territory: String,
    unit_model: Option<String>,
    risk_score: i32,
    predicted_failure: Option<String>,
    status: String,
    last_contact: Option<DateTime<Utc>>,
}

impl From<LeadRow> for Lead {
    fn from(row: LeadRow) -> Self {
        Self {
            id: LeadId::new(row.id),
            name: row.name,
            address: row.address,
            territory: row.territory,
            unit_model: row.unit_model,
            risk_score: row.risk_score,
            predicted_failure: row.predicted_failure,
            status: row.status,
            last_contact: row.last_contact,
        }
    }
}

/// Repository for lead database operations.
pub struct LeadRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> LeadRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all leads in ascending id order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Lead>, RepositoryError> {
        let rows = sqlx::query_as::<_, LeadRow>(&format!(
            "SELECT {LEAD_COLUMNS} FROM leads ORDER BY id"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a lead by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self), fields(lead_id = %id))]
    pub async fn get_by_id(&self, id: LeadId) -> Result<Option<Lead>, RepositoryError> {
        let row = sqlx::query_as::<_, LeadRow>(&format!(
            "SELECT {LEAD_COLUMNS} FROM leads WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Insert a lead. Unset risk score and status take the column defaults.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    #[instrument(skip(self, lead), fields(name = %lead.name))]
    pub async fn create(&self, lead: NewLead) -> Result<Lead, RepositoryError> {
        let row = sqlx::query_as::<_, LeadRow>(&format!(
            "INSERT INTO leads \
                 (name, address, territory, unit_model, risk_score, predicted_failure, status, last_contact) \
             VALUES ($1, $2, $3, $4, COALESCE($5, 0), $6, COALESCE($7, 'New'), $8) \
             RETURNING {LEAD_COLUMNS}"
        ))
        .bind(lead.name)
        .bind(lead.address)
        .bind(lead.territory)
        .bind(lead.unit_model)
        .bind(lead.risk_score)
        .bind(lead.predicted_failure)
        .bind(lead.status)
        .bind(lead.last_contact)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Apply the present fields of `patch` to a lead.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no lead has this id.
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self, patch), fields(lead_id = %id))]
    pub async fn update(&self, id: LeadId, patch: &LeadPatch) -> Result<Lead, RepositoryError> {
        if patch.is_empty() {
            return self.get_by_id(id).await?.ok_or(RepositoryError::NotFound);
        }

        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new("UPDATE leads SET ");
        {
            let mut set = builder.separated(", ");
            if let Some(v) = &patch.name {
                set.push("name = ").push_bind_unseparated(v.clone());
            }
            if let Some(v) = &patch.address {
                set.push("address = ").push_bind_unseparated(v.clone());
            }
            if let Some(v) = &patch.territory {
                set.push("territory = ").push_bind_unseparated(v.clone());
            }
            if let Some(v) = &patch.unit_model {
                set.push("unit_model = ").push_bind_unseparated(v.clone());
            }
            if let Some(v) = patch.risk_score {
                set.push("risk_score = ").push_bind_unseparated(v);
            }
            if let Some(v) = &patch.predicted_failure {
                set.push("predicted_failure = ")
                    .push_bind_unseparated(v.clone());
            }
            if let Some(v) = &patch.status {
                set.push("status = ").push_bind_unseparated(v.clone());
            }
            if let Some(v) = patch.last_contact {
                set.push("last_contact = ").push_bind_unseparated(v);
            }
        }
        builder.push(" WHERE id = ");
        builder.push_bind(id);
        builder.push(" RETURNING ");
        builder.push(LEAD_COLUMNS);

        let row = builder
            .build_query_as::<LeadRow>()
            .fetch_optional(self.pool)
            .await?;

        row.map(Into::into).ok_or(RepositoryError::NotFound)
    }

    /// Delete a lead. A missing id is not an error.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self), fields(lead_id = %id))]
    pub async fn delete(&self, id: LeadId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM leads WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(())
    }

    /// Number of leads.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM leads")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}
