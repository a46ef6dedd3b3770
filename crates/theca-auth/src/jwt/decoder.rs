//! Token verification.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::de::DeserializeOwned;

use theca_core::config::AuthConfig;

use super::claims::{AccessClaims, RefreshClaims};
use super::error::TokenError;

/// Allowed clock skew when checking `exp`, in seconds.
const LEEWAY_SECONDS: u64 = 5;

/// Verifies access and refresh tokens against their own secrets.
#[derive(Clone)]
pub struct JwtDecoder {
    access_key: DecodingKey,
    refresh_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = LEEWAY_SECONDS;

        Self {
            access_key: DecodingKey::from_secret(config.access_secret.as_bytes()),
            refresh_key: DecodingKey::from_secret(config.refresh_secret.as_bytes()),
            validation,
        }
    }

    /// Verifies an access token's signature, algorithm, and expiry.
    pub fn verify_access(&self, token: &str) -> Result<AccessClaims, TokenError> {
        self.decode_with(token, &self.access_key)
    }

    /// Verifies a refresh token's signature, algorithm, and expiry.
    ///
    /// The caller still has to compare `token_version` with the stored user
    /// via [`RefreshClaims::ensure_version`].
    pub fn verify_refresh(&self, token: &str) -> Result<RefreshClaims, TokenError> {
        self.decode_with(token, &self.refresh_key)
    }

    /// Verifies a refresh token and checks it against the user's stored version.
    pub fn verify_refresh_version(
        &self,
        token: &str,
        stored_version: i64,
    ) -> Result<RefreshClaims, TokenError> {
        let claims = self.verify_refresh(token)?;
        claims.ensure_version(stored_version)?;
        Ok(claims)
    }

    fn decode_with<T: DeserializeOwned>(&self, token: &str, key: &DecodingKey) -> Result<T, TokenError> {
        let data = decode::<T>(token, key, &self.validation).map_err(|e| {
            tracing::debug!(error = %e, "Token rejected");
            TokenError::from(e)
        })?;
        Ok(data.claims)
    }
}
