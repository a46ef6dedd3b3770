//! Shared value types.

pub mod response;

pub use response::{ApiErrorBody, ApiResponse};
