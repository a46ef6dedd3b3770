//! # theca-core
//!
//! Core crate for Theca. Contains the closed error taxonomy, the uniform
//! response envelope, and the configuration schemas.
//!
//! This crate has **no** internal dependencies on other Theca crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::{AppError, ErrorCode};
pub use result::AppResult;
