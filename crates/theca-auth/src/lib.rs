//! # theca-auth
//!
//! Token issuance and verification plus password hashing for Theca.
//!
//! ## Modules
//!
//! - `jwt`: HS256 access and refresh tokens, signed with distinct secrets
//! - `password`: Argon2id password hashing

pub mod jwt;
pub mod password;

pub use jwt::{AccessClaims, JwtDecoder, JwtEncoder, RefreshClaims, TokenError, TokenPair};
pub use password::{HashParams, PasswordHasher};
