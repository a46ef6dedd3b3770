//! Bookmark entity model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A saved link belonging to a user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Bookmark {
    /// Unique bookmark identifier.
    pub id: i64,
    /// Owning user.
    pub user_id: i64,
    /// Display title.
    pub title: String,
    /// Target URL.
    pub url: String,
    /// Favicon URL.
    pub icon_url: Option<String>,
    /// Whether the title is shown next to the icon.
    pub show_text: bool,
}
