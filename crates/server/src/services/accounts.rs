//! User account creation.

use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use thiserror::Error;
use tracing::instrument;

use hvac_dash_core::{UserRole, Username, UsernameError};

use crate::db::{Database, RepositoryError};
use crate::models::{NewUser, User};

const MIN_PASSWORD_LENGTH: usize = 8;

/// Errors from account operations.
#[derive(Debug, Error)]
pub enum AccountError {
    #[error("invalid username: {0}")]
    InvalidUsername(#[from] UsernameError),

    #[error("password must be at least {MIN_PASSWORD_LENGTH} characters")]
    WeakPassword,

    #[error("username already exists")]
    UsernameTaken,

    #[error("password hashing failed")]
    PasswordHash,

    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Creates dashboard accounts.
pub struct AccountService<'a> {
    db: &'a Database,
}

impl<'a> AccountService<'a> {
    #[must_use]
    pub const fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Create a user with an Argon2id-hashed password.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::InvalidUsername` or `AccountError::WeakPassword`
    /// for bad input, `AccountError::UsernameTaken` if the name is in use.
    #[instrument(skip(self, password))]
    pub async fn create_user(
        &self,
        username: &str,
        password: &str,
        role: UserRole,
    ) -> Result<User, AccountError> {
        let username = Username::parse(username)?;
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AccountError::WeakPassword);
        }

        let password_hash = hash_password(password)?;
        let user = self
            .db
            .create_user(NewUser {
                username,
                password_hash,
                role,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AccountError::UsernameTaken,
                other => AccountError::Repository(other),
            })?;

        tracing::info!(user_id = %user.id, username = %user.username, "Created user");
        Ok(user)
    }
}

/// Hash a password with Argon2id.
fn hash_password(password: &str) -> Result<String, AccountError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AccountError::PasswordHash)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use argon2::password_hash::{PasswordHash, PasswordVerifier};

    use super::*;
    use crate::db::ReferenceDb;

    fn verify_password(password: &str, hash: &str) -> bool {
        let parsed_hash = PasswordHash::new(hash).unwrap();
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }

    #[test]
    fn test_hash_is_argon2id_and_verifies() {
        let hash = hash_password("furnace-filter-42").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("furnace-filter-42", &hash));
        assert!(!verify_password("wrong-password", &hash));
    }

    #[tokio::test]
    async fn test_create_user() {
        let db = Database::Reference(ReferenceDb::default());
        let service = AccountService::new(&db);

        let user = service
            .create_user("dispatch", "furnace-filter-42", UserRole::Technician)
            .await
            .unwrap();
        assert_eq!(user.username, "dispatch");
        assert_eq!(user.role, "technician");

        let duplicate = service
            .create_user("dispatch", "another-password", UserRole::Admin)
            .await;
        assert!(matches!(duplicate, Err(AccountError::UsernameTaken)));
    }

    #[tokio::test]
    async fn test_rejects_bad_input() {
        let db = Database::Reference(ReferenceDb::default());
        let service = AccountService::new(&db);

        assert!(matches!(
            service.create_user("bad name", "furnace-filter-42", UserRole::Admin).await,
            Err(AccountError::InvalidUsername(_))
        ));
        assert!(matches!(
            service.create_user("dispatch", "short", UserRole::Admin).await,
            Err(AccountError::WeakPassword)
        ));
    }
}
