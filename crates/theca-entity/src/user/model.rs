//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A registered Theca user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: i64,
    /// Unique email address.
    pub email: String,
    /// Unique login name.
    pub username: String,
    /// Argon2 password hash.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Pending email verification code, if any.
    pub verification_code: Option<String>,
    /// Version embedded in refresh tokens; bumping it revokes them all.
    #[serde(skip_serializing)]
    pub refresh_token_version: i64,
    /// Number of bookmarks the user owns.
    pub amount_of_bookmarks: i32,
    /// Whether the email address was verified.
    #[serde(skip_serializing)]
    pub is_verified: bool,
    /// Whether the user has a premium plan.
    pub is_premium: bool,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Invalidate every refresh token issued so far.
    pub fn bump_token_version(&mut self) {
        self.refresh_token_version += 1;
        self.updated_at = Utc::now();
    }
}

/// Data required to create a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    /// Email address.
    pub email: String,
    /// Desired username.
    pub username: String,
    /// Pre-hashed password.
    pub password_hash: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        let now = Utc::now();
        User {
            id: 7,
            email: "a@example.com".into(),
            username: "alice".into(),
            password_hash: "$argon2id$...".into(),
            verification_code: None,
            refresh_token_version: 0,
            amount_of_bookmarks: 0,
            is_verified: false,
            is_premium: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_bump_token_version_is_monotonic() {
        let mut user = user();
        user.bump_token_version();
        user.bump_token_version();
        assert_eq!(user.refresh_token_version, 2);
    }

    #[test]
    fn test_secrets_are_not_serialized() {
        let json = serde_json::to_value(user()).unwrap();
        assert!(json.get("password_hash").is_none());
        assert!(json.get("refresh_token_version").is_none());
        assert_eq!(json["username"], "alice");
    }
}
