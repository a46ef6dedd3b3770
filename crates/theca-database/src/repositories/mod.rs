//! User store implementations.

pub mod memory;
pub mod user;
