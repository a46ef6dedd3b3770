//! JWT token encoding, decoding, and claims.

pub mod claims;
pub mod decoder;
pub mod encoder;
pub mod error;

pub use claims::{AccessClaims, RefreshClaims};
pub use decoder::JwtDecoder;
pub use encoder::{JwtEncoder, TokenPair};
pub use error::TokenError;
