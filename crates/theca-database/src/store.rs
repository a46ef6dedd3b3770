//! The narrow persistence interface the service layer depends on.

use async_trait::async_trait;

use theca_core::result::AppResult;
use theca_entity::user::{NewUser, User};

/// CRUD access to users.
///
/// Implementations translate their own failures into taxonomy codes before
/// returning, so callers can pass errors through untouched.
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    /// Insert a user unless the username or email is already taken.
    ///
    /// Fails with `USER_ALREADY_EXISTS` on either clash.
    async fn create_if_absent(&self, user: NewUser) -> AppResult<User>;

    /// Find a user by username.
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// Find a user by primary key.
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>>;

    /// Persist every mutable field of an existing user.
    async fn save(&self, user: &User) -> AppResult<()>;
}
