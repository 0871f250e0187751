//! Settings repository.
//!
//! The table holds at most one row, `id = 1`. Writes are a single
//! `INSERT ... ON CONFLICT (id) DO UPDATE`, so concurrent first writers
//! converge on the same row.

use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;

use hvac_dash_core::SettingsId;

use super::RepositoryError;
use crate::models::{Settings, SettingsPatch};

const SETTINGS_COLUMNS: &str =
    "id, company_name, logo_url, theme, currency, truck_roll_cost, energy_waste_cost";

#[derive(Debug, sqlx::FromRow)]
struct SettingsRow {
    id: i32,
    company_name: Option<String>,
    logo_url: Option<String>,
    theme: Option<String>,
    currency: Option<String>,
    truck_roll_cost: Option<i32>,
    energy_waste_cost: Option<i32>,
}

impl From<SettingsRow> for Settings {
    fn from(row: SettingsRow) -> Self {
        Self {
            id: SettingsId::new(row.id),
            company_name: row.company_name,
            logo_url: row.logo_url,
            theme: row.theme,
            currency: row.currency,
            truck_roll_cost: row.truck_roll_cost,
            energy_waste_cost: row.energy_waste_cost,
        }
    }
}

/// Repository for the settings singleton.
pub struct SettingsRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SettingsRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get the settings row, if present.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn get(&self) -> Result<Option<Settings>, RepositoryError> {
        let row = sqlx::query_as::<_, SettingsRow>(&format!(
            "SELECT {SETTINGS_COLUMNS} FROM settings WHERE id = $1"
        ))
        .bind(SettingsId::SINGLETON)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Insert or update the settings row with the present fields of `patch`.
    ///
    /// Absent fields keep their current value, or the column default when the
    /// row is being created.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn upsert(&self, patch: &SettingsPatch) -> Result<Settings, RepositoryError> {
        let columns = patch.columns();

        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new("INSERT INTO settings (id");
        for column in &columns {
            builder.push(", ");
            builder.push(*column);
        }

        // Bind order must follow `SettingsPatch::columns`.
        builder.push(") VALUES (");
        builder.push_bind(SettingsId::SINGLETON);
        if let Some(v) = &patch.company_name {
            builder.push(", ");
            builder.push_bind(v.clone());
        }
        if let Some(v) = &patch.logo_url {
            builder.push(", ");
            builder.push_bind(v.clone());
        }
        if let Some(v) = &patch.theme {
            builder.push(", ");
            builder.push_bind(v.clone());
        }
        if let Some(v) = &patch.currency {
            builder.push(", ");
            builder.push_bind(v.clone());
        }
        if let Some(v) = patch.truck_roll_cost {
            builder.push(", ");
            builder.push_bind(v);
        }
        if let Some(v) = patch.energy_waste_cost {
            builder.push(", ");
            builder.push_bind(v);
        }

        builder.push(") ON CONFLICT (id) DO UPDATE SET ");
        if columns.is_empty() {
            builder.push("id = EXCLUDED.id");
        } else {
            let mut assignments = builder.separated(", ");
            for column in &columns {
                assignments.push(format!("{column} = EXCLUDED.{column}"));
            }
        }
        builder.push(" RETURNING ");
        builder.push(SETTINGS_COLUMNS);

        let row = builder
            .build_query_as::<SettingsRow>()
            .fetch_one(self.pool)
            .await?;

        Ok(row.into())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    async fn test_pool() -> Option<PgPool> {
        let url = std::env::var("DATABASE_URL").ok()?;
        let pool = PgPool::connect(&url).await.ok()?;
        crate::db::run_migrations(&pool).await.ok()?;
        sqlx::query("DELETE FROM settings").execute(&pool).await.ok()?;
        Some(pool)
    }

    #[tokio::test]
    #[ignore = "requires DATABASE_URL"]
    async fn test_upsert_creates_then_updates_single_row() {
        let Some(pool) = test_pool().await else {
            return;
        };
        let repo = SettingsRepository::new(&pool);

        assert!(repo.get().await.unwrap().is_none());

        let created = repo
            .upsert(&SettingsPatch {
                truck_roll_cost: Some(300),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(created.truck_roll_cost, Some(300));
        assert_eq!(created.company_name.as_deref(), Some("My HVAC Company"));

        let updated = repo
            .upsert(&SettingsPatch {
                company_name: Some("North York Heating".to_string()),
                logo_url: Some(None),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(updated.truck_roll_cost, Some(300));
        assert_eq!(updated.company_name.as_deref(), Some("North York Heating"));

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM settings")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    #[ignore = "requires DATABASE_URL"]
    async fn test_empty_upsert_creates_defaults() {
        let Some(pool) = test_pool().await else {
            return;
        };
        let settings = SettingsRepository::new(&pool)
            .upsert(&SettingsPatch::default())
            .await
            .unwrap();
        assert_eq!(settings, Settings::column_defaults());
    }
}
