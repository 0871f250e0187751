//! In-memory store used when no database URL is configured, and by tests.
//!
//! Each table is a `BTreeMap` keyed by id behind its own async mutex, so
//! listing returns rows in ascending id order like the SQL driver.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use hvac_dash_core::{GrantId, LeadId, UserId};

use super::RepositoryError;
use crate::models::{Grant, Lead, LeadPatch, NewGrant, NewLead, NewUser, Settings, SettingsPatch, User};

#[derive(Debug)]
struct Table<T> {
    rows: BTreeMap<i32, T>,
    next_id: i32,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<T> Table<T> {
    fn allocate_id(&mut self) -> i32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

#[derive(Debug)]
struct UserRecord {
    user: User,
    #[allow(dead_code)] // never read back; mirrors the `password` column
    password_hash: String,
}

/// Reference implementation
#[derive(Debug, Clone, Default)]
pub struct ReferenceDb {
    settings: Arc<Mutex<Option<Settings>>>,
    leads: Arc<Mutex<Table<Lead>>>,
    grants: Arc<Mutex<Table<Grant>>>,
    users: Arc<Mutex<Table<UserRecord>>>,
}

impl ReferenceDb {
    pub async fn get_settings(&self) -> Option<Settings> {
        self.settings.lock().await.clone()
    }

    pub async fn update_settings(&self, patch: &SettingsPatch) -> Settings {
        let mut settings = self.settings.lock().await;
        let row = settings.get_or_insert_with(Settings::column_defaults);
        row.apply(patch);
        row.clone()
    }

    pub async fn get_leads(&self) -> Vec<Lead> {
        self.leads.lock().await.rows.values().cloned().collect()
    }

    pub async fn create_lead(&self, lead: NewLead) -> Lead {
        let mut leads = self.leads.lock().await;
        let id = leads.allocate_id();
        let lead = Lead::from_new(LeadId::new(id), lead);
        leads.rows.insert(id, lead.clone());
        lead
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no lead has this id.
    pub async fn update_lead(&self, id: LeadId, patch: &LeadPatch) -> Result<Lead, RepositoryError> {
        let mut leads = self.leads.lock().await;
        let lead = leads
            .rows
            .get_mut(&id.as_i32())
            .ok_or(RepositoryError::NotFound)?;
        lead.apply(patch);
        Ok(lead.clone())
    }

    pub async fn delete_lead(&self, id: LeadId) {
        self.leads.lock().await.rows.remove(&id.as_i32());
    }

    pub async fn get_grants(&self) -> Vec<Grant> {
        self.grants.lock().await.rows.values().cloned().collect()
    }

    pub async fn insert_grant(&self, grant: NewGrant) -> Grant {
        let mut grants = self.grants.lock().await;
        let id = grants.allocate_id();
        let grant = Grant::from_new(GrantId::new(id), grant);
        grants.rows.insert(id, grant.clone());
        grant
    }

    pub async fn get_user(&self, id: UserId) -> Option<User> {
        self.users
            .lock()
            .await
            .rows
            .get(&id.as_i32())
            .map(|record| record.user.clone())
    }

    pub async fn get_user_by_username(&self, username: &str) -> Option<User> {
        self.users
            .lock()
            .await
            .rows
            .values()
            .find(|record| record.user.username == username)
            .map(|record| record.user.clone())
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the username is taken.
    pub async fn create_user(&self, user: NewUser) -> Result<User, RepositoryError> {
        let mut users = self.users.lock().await;
        if users
            .rows
            .values()
            .any(|record| record.user.username == user.username.as_str())
        {
            return Err(RepositoryError::Conflict("username already exists".to_owned()));
        }

        let id = users.allocate_id();
        let created = User {
            id: UserId::new(id),
            username: user.username.into_inner(),
            role: user.role.as_str().to_string(),
        };
        users.rows.insert(
            id,
            UserRecord {
                user: created.clone(),
                password_hash: user.password_hash,
            },
        );
        Ok(created)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use hvac_dash_core::{UserRole, Username};

    use super::*;

    #[tokio::test]
    async fn test_settings_upsert_keeps_single_row() {
        let db = ReferenceDb::default();
        assert!(db.get_settings().await.is_none());

        let first = db
            .update_settings(&SettingsPatch {
                company_name: Some("Scarborough Comfort".to_string()),
                ..Default::default()
            })
            .await;
        assert_eq!(first.theme.as_deref(), Some("navy"));

        let second = db
            .update_settings(&SettingsPatch {
                theme: Some("light".to_string()),
                ..Default::default()
            })
            .await;
        assert_eq!(second.id, first.id);
        assert_eq!(second.company_name.as_deref(), Some("Scarborough Comfort"));
        assert_eq!(second.theme.as_deref(), Some("light"));
    }

    #[tokio::test]
    async fn test_leads_crud() {
        let db = ReferenceDb::default();
        for name in ["A", "B", "C"] {
            db.create_lead(NewLead::new(name, "addr", "Vaughan-East")).await;
        }
        let leads = db.get_leads().await;
        assert_eq!(leads.len(), 3);
        let ids: Vec<_> = leads.iter().map(|l| l.id.as_i32()).collect();
        assert_eq!(ids, vec![1, 2, 3]);

        db.delete_lead(LeadId::new(2)).await;
        db.delete_lead(LeadId::new(2)).await;
        assert_eq!(db.get_leads().await.len(), 2);

        let missing = db.update_lead(LeadId::new(2), &LeadPatch::default()).await;
        assert!(matches!(missing, Err(RepositoryError::NotFound)));

        let created = db.create_lead(NewLead::new("D", "addr", "Vaughan-East")).await;
        assert_eq!(created.id, LeadId::new(4));
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let db = ReferenceDb::default();
        let new_user = || NewUser {
            username: Username::parse("dispatch").unwrap(),
            password_hash: "hash".to_string(),
            role: UserRole::Admin,
        };

        let user = db.create_user(new_user()).await.unwrap();
        assert_eq!(user.role, "admin");
        assert_eq!(db.get_user(user.id).await, Some(user.clone()));
        assert_eq!(db.get_user_by_username("dispatch").await, Some(user));

        let duplicate = db.create_user(new_user()).await;
        assert!(matches!(duplicate, Err(RepositoryError::Conflict(_))));
    }
}
