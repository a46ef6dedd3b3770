//! # theca-api
//!
//! HTTP API layer for Theca built on Axum.
//!
//! Two routers share one [`AppState`]: the public router serves `/v1` with
//! CORS, tracing, request metrics and the auth gate on `/v1/api`; the admin
//! router serves `/metrics` and `/health` with no middleware at all.

pub mod app;
pub mod dto;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::run_server;
pub use router::{build_admin_router, build_public_router};
pub use state::AppState;
