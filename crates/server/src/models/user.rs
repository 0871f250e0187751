//! Dashboard user accounts.

use serde::Serialize;

use hvac_dash_core::{UserId, UserRole, Username};

/// A user account. The password hash never leaves the store layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub role: String,
}

/// Insert payload for a user.
///
/// Implements `Debug` manually to redact the password hash.
#[derive(Clone)]
pub struct NewUser {
    pub username: Username,
    /// Argon2id PHC string.
    pub password_hash: String,
    pub role: UserRole,
}

impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("username", &self.username)
            .field("password_hash", &"[REDACTED]")
            .field("role", &self.role)
            .finish()
    }
}
