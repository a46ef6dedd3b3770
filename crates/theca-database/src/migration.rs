//! Database migration runner.

use sqlx::PgPool;
use tracing::info;

use theca_core::error::{AppError, ErrorCode};

/// Run all pending database migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    info!("Running database migrations...");

    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .map_err(|e| AppError::with_source(ErrorCode::InternalError, "Failed to run migrations", e))?;

    info!("Database migrations completed successfully");
    Ok(())
}
