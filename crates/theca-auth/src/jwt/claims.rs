//! Claims carried by access and refresh tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::TokenError;

/// Payload of a short-lived access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject user ID.
    #[serde(rename = "userId")]
    pub user_id: i64,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

impl AccessClaims {
    /// Checks whether this token has expired.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }

    /// Returns the expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Returns the issue time as a `DateTime<Utc>`.
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.iat, 0)
    }
}

/// Payload of a long-lived refresh token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshClaims {
    /// Subject user ID.
    #[serde(rename = "userId")]
    pub user_id: i64,
    /// The user's token version at issuance.
    #[serde(rename = "tokenVersion")]
    pub token_version: i64,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

impl RefreshClaims {
    /// Rejects the token unless it was issued for the user's current version.
    pub fn ensure_version(&self, current: i64) -> Result<(), TokenError> {
        if self.token_version == current {
            Ok(())
        } else {
            Err(TokenError::Revoked)
        }
    }
}
