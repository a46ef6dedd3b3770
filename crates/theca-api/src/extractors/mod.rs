//! Custom Axum extractors.

pub mod auth;
pub mod json;
pub mod route;

pub use auth::AuthUser;
pub use json::ValidatedJson;
pub use route::RouteLabels;
