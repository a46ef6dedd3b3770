//! `AuthUser` extractor: the identity the auth gate attached to the request.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use chrono::{DateTime, Utc};

use theca_auth::{AccessClaims, TokenError};
use theca_core::error::AppError;

/// Authenticated caller, inserted into request extensions by
/// [`require_auth`](crate::middleware::auth::require_auth).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    /// Subject of the access token.
    pub user_id: i64,
    /// When the token was signed.
    pub issued_at: DateTime<Utc>,
    /// When the token stops being accepted.
    pub expires_at: DateTime<Utc>,
}

impl TryFrom<AccessClaims> for AuthUser {
    type Error = TokenError;

    fn try_from(claims: AccessClaims) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: claims.user_id,
            issued_at: claims.issued_at().ok_or(TokenError::Malformed)?,
            expires_at: claims.expires_at().ok_or(TokenError::Malformed)?,
        })
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .copied()
            .ok_or_else(|| AppError::unauthorized("Authentication required"))
    }
}
