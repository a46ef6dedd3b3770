//! Route definitions for the public and admin listeners.

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{delete, get, post},
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the public router.
///
/// `/v1/api/*` sits behind the auth gate. Request metrics wrap everything,
/// so rejected and unmatched requests are counted too.
pub fn build_public_router(state: AppState) -> Router {
    let v1 = Router::new()
        .merge(auth_routes())
        .nest("/api", protected_routes(state.clone()));

    Router::new()
        .nest("/v1", v1)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::cors::build_cors_layer(&state.config.server.cors))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::metrics::track_metrics,
        ))
        .with_state(state)
}

/// Build the admin router: scrape and health only, no middleware.
pub fn build_admin_router(state: AppState) -> Router {
    Router::new()
        .route("/metrics", get(handlers::metrics::metrics))
        .route("/health", get(handlers::health::health))
        .with_state(state)
}

/// Unauthenticated account endpoints
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/refresh", post(handlers::auth::refresh))
}

/// Endpoints requiring a bearer access token
fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/logout", delete(handlers::auth::logout))
        .route("/sessions", delete(handlers::auth::logout_all))
        .route_layer(axum_middleware::from_fn_with_state(
            state,
            middleware::auth::require_auth,
        ))
}
