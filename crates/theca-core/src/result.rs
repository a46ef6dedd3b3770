//! Convenience result type alias for Theca.

use crate::error::AppError;

/// A specialized `Result` type for Theca operations.
pub type AppResult<T> = Result<T, AppError>;
