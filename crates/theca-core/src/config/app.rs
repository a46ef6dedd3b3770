//! Listener and CORS configuration.

use serde::{Deserialize, Serialize};

/// HTTP server configuration for both listeners.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Public API bind address.
    #[serde(default = "default_host")]
    pub host: String,
    /// Public API bind port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Admin (metrics, health) bind address.
    #[serde(default = "default_admin_host")]
    pub admin_host: String,
    /// Admin bind port.
    #[serde(default = "default_admin_port")]
    pub admin_port: u16,
    /// How long in-flight requests may drain before shutdown is forced.
    #[serde(default = "default_shutdown_grace")]
    pub shutdown_grace_seconds: u64,
    /// Mark the refresh cookie `Secure`.
    #[serde(default)]
    pub secure_cookies: bool,
    /// CORS configuration for the public listener.
    #[serde(default)]
    pub cors: CorsConfig,
}

impl ServerConfig {
    /// `host:port` of the public listener.
    pub fn public_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// `host:port` of the admin listener.
    pub fn admin_addr(&self) -> String {
        format!("{}:{}", self.admin_host, self.admin_port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            admin_host: default_admin_host(),
            admin_port: default_admin_port(),
            shutdown_grace_seconds: default_shutdown_grace(),
            secure_cookies: false,
            cors: CorsConfig::default(),
        }
    }
}

/// CORS (Cross-Origin Resource Sharing) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Allowed origins (use `["*"]` for development only).
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
    /// Allowed HTTP methods.
    #[serde(default = "default_allowed_methods")]
    pub allowed_methods: Vec<String>,
    /// Allowed HTTP headers.
    #[serde(default = "default_allowed_headers")]
    pub allowed_headers: Vec<String>,
    /// Max age for preflight cache in seconds.
    #[serde(default = "default_max_age")]
    pub max_age_seconds: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
            allowed_methods: default_allowed_methods(),
            allowed_headers: default_allowed_headers(),
            max_age_seconds: default_max_age(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_admin_host() -> String {
    "127.0.0.1".to_string()
}

fn default_admin_port() -> u16 {
    8081
}

fn default_shutdown_grace() -> u64 {
    15
}

fn default_allowed_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_allowed_methods() -> Vec<String> {
    ["GET", "POST", "PUT", "DELETE", "PATCH", "OPTIONS"]
        .iter()
        .map(|m| m.to_string())
        .collect()
}

fn default_allowed_headers() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_max_age() -> u64 {
    3600
}
