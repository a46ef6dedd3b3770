//! Token creation with separate access and refresh signing keys.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde::Serialize;

use theca_core::config::AuthConfig;
use theca_core::error::{AppError, ErrorCode};

use super::claims::{AccessClaims, RefreshClaims};

/// Creates signed HS256 access and refresh tokens.
#[derive(Clone)]
pub struct JwtEncoder {
    access_key: EncodingKey,
    refresh_key: EncodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish()
    }
}

/// Result of a successful login.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TokenPair {
    /// Short-lived access token.
    pub access_token: String,
    /// Long-lived refresh token.
    pub refresh_token: String,
    /// Refresh token expiration; used for the cookie lifetime.
    pub refresh_expires_at: DateTime<Utc>,
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            access_key: EncodingKey::from_secret(config.access_secret.as_bytes()),
            refresh_key: EncodingKey::from_secret(config.refresh_secret.as_bytes()),
            access_ttl: Duration::minutes(config.access_ttl_minutes as i64),
            refresh_ttl: Duration::days(config.refresh_ttl_days as i64),
        }
    }

    /// Issues an access token for `user_id`, valid from now.
    pub fn issue_access(&self, user_id: i64) -> Result<String, AppError> {
        self.issue_access_at(user_id, Utc::now())
    }

    /// Issues an access token as if signed at `issued_at`.
    pub fn issue_access_at(&self, user_id: i64, issued_at: DateTime<Utc>) -> Result<String, AppError> {
        let claims = AccessClaims {
            user_id,
            iat: issued_at.timestamp(),
            exp: (issued_at + self.access_ttl).timestamp(),
        };
        sign(&claims, &self.access_key, "access")
    }

    /// Issues a refresh token bound to the user's current token version.
    pub fn issue_refresh(&self, user_id: i64, token_version: i64) -> Result<(String, DateTime<Utc>), AppError> {
        let now = Utc::now();
        let exp = now + self.refresh_ttl;
        let claims = RefreshClaims {
            user_id,
            token_version,
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };
        Ok((sign(&claims, &self.refresh_key, "refresh")?, exp))
    }

    /// Issues both tokens for a successful login.
    pub fn issue_pair(&self, user_id: i64, token_version: i64) -> Result<TokenPair, AppError> {
        let access_token = self.issue_access(user_id)?;
        let (refresh_token, refresh_expires_at) = self.issue_refresh(user_id, token_version)?;
        Ok(TokenPair {
            access_token,
            refresh_token,
            refresh_expires_at,
        })
    }
}

fn sign<T: Serialize>(claims: &T, key: &EncodingKey, kind: &str) -> Result<String, AppError> {
    encode(&Header::default(), claims, key).map_err(|e| {
        AppError::with_source(ErrorCode::InternalError, format!("Failed to encode {kind} token"), e)
    })
}
