//! Token verification failures.

use thiserror::Error;

use theca_core::error::AppError;

/// Why a token was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Signature, key, or algorithm does not match.
    #[error("invalid token signature")]
    InvalidSignature,
    /// The `exp` claim has passed.
    #[error("token has expired")]
    Expired,
    /// Not a JWT, or required claims are absent or mistyped.
    #[error("malformed token")]
    Malformed,
    /// Refresh token version no longer matches the user's.
    #[error("token has been revoked")]
    Revoked,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::InvalidSignature
            | ErrorKind::InvalidAlgorithm
            | ErrorKind::InvalidKeyFormat => Self::InvalidSignature,
            _ => Self::Malformed,
        }
    }
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        let message = match err {
            TokenError::InvalidSignature | TokenError::Malformed => "Invalid or expired token",
            TokenError::Expired => "Token expired",
            TokenError::Revoked => "Token has been revoked",
        };
        AppError::unauthorized(message)
    }
}
