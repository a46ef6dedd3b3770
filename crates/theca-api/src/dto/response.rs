//! Response DTOs. The envelope itself lives in `theca_core::types`.

use serde::{Deserialize, Serialize};

pub use theca_core::types::ApiResponse;

/// Body of a successful login or refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenResponse {
    /// Short-lived bearer token.
    pub access_token: String,
}

/// Health check payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"` while the process serves requests.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Seconds since the state was built.
    pub uptime_seconds: u64,
}
