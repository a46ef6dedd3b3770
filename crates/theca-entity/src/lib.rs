//! # theca-entity
//!
//! Domain entity models for Theca. Every struct in this crate represents a
//! database table row or the data needed to create one. Database entities
//! derive `sqlx::FromRow`.

pub mod bookmark;
pub mod user;
