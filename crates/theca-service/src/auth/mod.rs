//! Registration, login, and session invalidation.

pub mod service;

pub use service::AuthService;
