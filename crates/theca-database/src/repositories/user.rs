//! PostgreSQL user repository.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::error;

use theca_core::error::{AppError, ErrorCode};
use theca_core::result::AppResult;
use theca_entity::user::{NewUser, User};

use crate::store::UserStore;

/// Repository for user CRUD against PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn count_where(&self, column: &str, value: &str) -> AppResult<i64> {
        let query = format!("SELECT COUNT(*) FROM users WHERE {column} = $1");
        sqlx::query_scalar::<_, i64>(&query)
            .bind(value)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, column, "Failed to count users");
                AppError::from_persistence(e)
            })
    }
}

#[async_trait]
impl UserStore for PgUserRepository {
    async fn create_if_absent(&self, user: NewUser) -> AppResult<User> {
        if self.count_where("username", &user.username).await? > 0 {
            return Err(AppError::user_already_exists(
                "A user with this username already exists",
            ));
        }
        if self.count_where("email", &user.email).await? > 0 {
            return Err(AppError::user_already_exists(
                "A user with this email already exists",
            ));
        }

        sqlx::query_as::<_, User>(
            r#"INSERT INTO users (email, username, password_hash)
               VALUES ($1, $2, $3)
               RETURNING *"#,
        )
        .bind(&user.email)
        .bind(&user.username)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            // A concurrent registration can slip between the checks and the insert.
            let err = AppError::from_persistence(e);
            if err.is(ErrorCode::DataConflict) {
                AppError::user_already_exists("User already exists")
            } else {
                error!(error = %err, "Failed to create user");
                err
            }
        })
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to get user by username");
                AppError::from_persistence(e)
            })
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, user_id = id, "Failed to get user by id");
                AppError::from_persistence(e)
            })
    }

    async fn save(&self, user: &User) -> AppResult<()> {
        let result = sqlx::query(
            r#"UPDATE users SET
                   email = $2,
                   username = $3,
                   password_hash = $4,
                   verification_code = $5,
                   refresh_token_version = $6,
                   amount_of_bookmarks = $7,
                   is_verified = $8,
                   is_premium = $9,
                   updated_at = NOW()
               WHERE id = $1"#,
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.verification_code)
        .bind(user.refresh_token_version)
        .bind(user.amount_of_bookmarks)
        .bind(user.is_verified)
        .bind(user.is_premium)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, user_id = user.id, "Failed to save user");
            AppError::from_persistence(e)
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::user_not_found());
        }
        Ok(())
    }
}
