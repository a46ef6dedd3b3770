//! Password hashing.

pub mod hasher;

pub use argon2::Params as HashParams;
pub use hasher::PasswordHasher;
