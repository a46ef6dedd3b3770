//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use theca_auth::{JwtDecoder, JwtEncoder, PasswordHasher};
use theca_core::config::AppConfig;
use theca_database::UserStore;
use theca_metrics::{Metrics, RpsAggregator};
use theca_service::AuthService;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Account lifecycle service
    pub auth_service: Arc<AuthService>,
    /// Access/refresh token verifier used by the auth gate
    pub jwt_decoder: Arc<JwtDecoder>,
    /// Request metric families
    pub metrics: Arc<Metrics>,
    /// Sliding-window RPS aggregator feeding `metrics`
    pub rps: Arc<RpsAggregator>,
    /// Process start, for uptime reporting
    pub started_at: Instant,
}

impl AppState {
    /// Wires services around a user store.
    pub fn new(config: Arc<AppConfig>, store: Arc<dyn UserStore>, hasher: PasswordHasher) -> Self {
        let jwt_encoder = Arc::new(JwtEncoder::new(&config.auth));
        let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));

        let auth_service = Arc::new(AuthService::new(
            store,
            Arc::new(hasher),
            Arc::clone(&jwt_encoder),
            Arc::clone(&jwt_decoder),
        ));

        let metrics = Arc::new(Metrics::from_config(&config.metrics));
        let rps = Arc::new(RpsAggregator::new(
            config.metrics.window(),
            Arc::clone(&metrics),
        ));

        Self {
            config,
            auth_service,
            jwt_decoder,
            metrics,
            rps,
            started_at: Instant::now(),
        }
    }
}
