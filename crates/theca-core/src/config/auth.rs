//! Token signing configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Secrets and lifetimes for access and refresh tokens.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret for access tokens.
    #[serde(default = "default_access_secret")]
    pub access_secret: String,
    /// HMAC secret for refresh tokens. Must differ from `access_secret`.
    #[serde(default = "default_refresh_secret")]
    pub refresh_secret: String,
    /// Access token TTL in minutes.
    #[serde(default = "default_access_ttl")]
    pub access_ttl_minutes: u64,
    /// Refresh token TTL in days.
    #[serde(default = "default_refresh_ttl")]
    pub refresh_ttl_days: u64,
}

impl AuthConfig {
    /// Whether either secret is still the shipped placeholder.
    pub fn uses_default_secrets(&self) -> bool {
        self.access_secret == default_access_secret()
            || self.refresh_secret == default_refresh_secret()
    }

    pub(crate) fn validate(&self) -> Result<(), AppError> {
        if self.access_secret.is_empty() || self.refresh_secret.is_empty() {
            return Err(AppError::configuration("JWT secrets must not be empty"));
        }
        if self.access_secret == self.refresh_secret {
            return Err(AppError::configuration(
                "access and refresh secrets must differ",
            ));
        }
        if self.access_ttl_minutes == 0 || self.refresh_ttl_days == 0 {
            return Err(AppError::configuration("token lifetimes must be positive"));
        }
        Ok(())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_secret: default_access_secret(),
            refresh_secret: default_refresh_secret(),
            access_ttl_minutes: default_access_ttl(),
            refresh_ttl_days: default_refresh_ttl(),
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("access_secret", &"****")
            .field("refresh_secret", &"****")
            .field("access_ttl_minutes", &self.access_ttl_minutes)
            .field("refresh_ttl_days", &self.refresh_ttl_days)
            .finish()
    }
}

fn default_access_secret() -> String {
    "CHANGE_ME_ACCESS_SECRET".to_string()
}

fn default_refresh_secret() -> String {
    "CHANGE_ME_REFRESH_SECRET".to_string()
}

fn default_access_ttl() -> u64 {
    15
}

fn default_refresh_ttl() -> u64 {
    7
}
