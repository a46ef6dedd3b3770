//! # theca-service
//!
//! Business logic for Theca. Services take their collaborators as `Arc`s at
//! construction time and pass typed errors from them through untouched.

pub mod auth;

pub use auth::AuthService;
