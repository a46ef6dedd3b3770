//! Unified application error types for Theca.
//!
//! Every failure that can reach a client is an [`AppError`] carrying exactly
//! one [`ErrorCode`] from a closed set. The code alone decides the HTTP status
//! and what clients branch on; the message is display text; the optional
//! source is only ever logged.

use std::fmt;
use std::str::FromStr;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::response::ApiResponse;

/// Closed taxonomy of client-facing error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Fallback for failures nobody classified.
    UnknownError,
    /// The request body or parameters are malformed.
    InvalidRequest,
    /// A server-side failure with a known cause.
    InternalError,
    /// The requested resource does not exist.
    NotFound,
    /// Missing, invalid, or expired credentials.
    Unauthorized,
    /// Authenticated, but not allowed.
    Forbidden,

    /// No user matches the given identity.
    UserNotFound,
    /// Username or email is already taken.
    UserAlreadyExists,
    /// The supplied password does not match.
    InvalidPassword,
    /// The supplied email is not acceptable.
    InvalidEmail,
    /// The supplied username is not acceptable.
    InvalidUsername,

    /// Persistence layer found no matching row.
    DataNotFound,
    /// Persistence layer rejected the data (referential integrity).
    DataInvalid,
    /// Persistence layer detected a duplicate key.
    DataConflict,
}

impl ErrorCode {
    /// Every code in the taxonomy.
    pub const ALL: [ErrorCode; 14] = [
        Self::UnknownError,
        Self::InvalidRequest,
        Self::InternalError,
        Self::NotFound,
        Self::Unauthorized,
        Self::Forbidden,
        Self::UserNotFound,
        Self::UserAlreadyExists,
        Self::InvalidPassword,
        Self::InvalidEmail,
        Self::InvalidUsername,
        Self::DataNotFound,
        Self::DataInvalid,
        Self::DataConflict,
    ];

    /// The wire representation of this code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnknownError => "UNKNOWN_ERROR",
            Self::InvalidRequest => "INVALID_REQUEST",
            Self::InternalError => "INTERNAL_ERROR",
            Self::NotFound => "NOT_FOUND",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::UserAlreadyExists => "USER_ALREADY_EXISTS",
            Self::InvalidPassword => "INVALID_PASSWORD",
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::InvalidUsername => "INVALID_USERNAME",
            Self::DataNotFound => "DATA_NOT_FOUND",
            Self::DataInvalid => "DATA_INVALID",
            Self::DataConflict => "DATA_CONFLICT",
        }
    }

    /// The HTTP status this code is reported with.
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::UnknownError | Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InvalidRequest
            | Self::InvalidPassword
            | Self::InvalidEmail
            | Self::InvalidUsername
            | Self::DataInvalid => StatusCode::BAD_REQUEST,
            Self::NotFound | Self::UserNotFound | Self::DataNotFound => StatusCode::NOT_FOUND,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::UserAlreadyExists | Self::DataConflict => StatusCode::CONFLICT,
        }
    }

    /// Status for a code received as text; unknown codes map to 500.
    pub fn status_for(code: &str) -> StatusCode {
        code.parse::<ErrorCode>()
            .map(|c| c.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when parsing a string that is not part of the taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown error code: {0}")]
pub struct UnknownErrorCode(pub String);

impl FromStr for ErrorCode {
    type Err = UnknownErrorCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownErrorCode(s.to_string()))
    }
}

/// The unified application error used throughout Theca.
#[derive(Debug, Error)]
#[error("{code}: {message}")]
pub struct AppError {
    /// Taxonomy code; drives status mapping and client branching.
    pub code: ErrorCode,
    /// Client-safe, human-readable message.
    pub message: String,
    /// Optional underlying cause. Logged, never sent to clients.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a terminal error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Wrap a lower-layer failure behind a client-safe code and message.
    pub fn with_source(
        code: ErrorCode,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Whether this error carries the given code.
    pub fn is(&self, code: ErrorCode) -> bool {
        self.code == code
    }

    /// HTTP status for this error.
    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    /// Create an invalid-request error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Create an unauthorized error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    /// Create a user-not-found error.
    pub fn user_not_found() -> Self {
        Self::new(ErrorCode::UserNotFound, "User not found")
    }

    /// Create a user-already-exists error.
    pub fn user_already_exists(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::UserAlreadyExists, message)
    }

    /// Create an invalid-password error.
    pub fn invalid_password() -> Self {
        Self::new(ErrorCode::InvalidPassword, "Invalid password")
    }

    /// Create a configuration failure (reported as internal).
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            code: self.code,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.code.http_status();

        if status.is_server_error() {
            match &self.source {
                Some(source) => {
                    tracing::error!(code = %self.code, error = %self.message, cause = %source, "Request failed")
                }
                None => tracing::error!(code = %self.code, error = %self.message, "Request failed"),
            }
        }

        (status, Json(ApiResponse::<()>::failure(self.code, self.message))).into_response()
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(ErrorCode::InternalError, "Serialization failed", err)
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorCode::InternalError, "I/O failure", err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(ErrorCode::InternalError, "Configuration error", err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self {
            code: ErrorCode::UnknownError,
            message: "Unknown error".to_string(),
            source: Some(err.into()),
        }
    }
}

/// Lower-cased fragments that mark a duplicate-key failure in driver text.
pub const CONFLICT_MARKERS: &[&str] = &["duplicate", "unique"];

/// Lower-cased fragments that mark a referential-integrity failure.
pub const FOREIGN_KEY_MARKERS: &[&str] = &["foreign key"];

/// Best-effort classification of a persistence error message.
///
/// Only used for failures the driver does not expose as a typed kind.
pub fn classify_persistence_message(text: &str) -> Option<ErrorCode> {
    let text = text.to_lowercase();
    if CONFLICT_MARKERS.iter().any(|m| text.contains(m)) {
        return Some(ErrorCode::DataConflict);
    }
    if FOREIGN_KEY_MARKERS.iter().any(|m| text.contains(m)) {
        return Some(ErrorCode::DataInvalid);
    }
    None
}

#[cfg(feature = "database")]
impl AppError {
    /// Classify a sqlx failure into the taxonomy.
    ///
    /// Typed conditions are checked first; the text allow-list is the
    /// fallback for drivers that only report a message.
    pub fn from_persistence(err: sqlx::Error) -> Self {
        use sqlx::error::ErrorKind as DbKind;

        match &err {
            sqlx::Error::RowNotFound => {
                return Self::new(ErrorCode::DataNotFound, "Record not found");
            }
            sqlx::Error::Database(db) => match db.kind() {
                DbKind::UniqueViolation => return conflict(),
                DbKind::ForeignKeyViolation => return integrity(),
                DbKind::NotNullViolation | DbKind::CheckViolation => {
                    return Self::new(ErrorCode::InvalidRequest, "Invalid data supplied");
                }
                _ => {}
            },
            _ => {}
        }

        match classify_persistence_message(&err.to_string()) {
            Some(ErrorCode::DataConflict) => conflict(),
            Some(ErrorCode::DataInvalid) => integrity(),
            _ => Self::with_source(ErrorCode::UnknownError, "Database error", err),
        }
    }
}

#[cfg(feature = "database")]
fn conflict() -> AppError {
    AppError::new(
        ErrorCode::DataConflict,
        "A record with the same data already exists",
    )
}

#[cfg(feature = "database")]
fn integrity() -> AppError {
    AppError::new(ErrorCode::DataInvalid, "Referential integrity violation")
}
