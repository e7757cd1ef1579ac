//! Schema migrations for the surveillance database.

use sqlx::PgPool;
use tracing::info;

use caselink_core::error::{AppError, ErrorKind};

/// Apply all pending migrations from the workspace `migrations/` directory.
///
/// Runs on startup before any repository touches the pool.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    info!("Applying schema migrations");

    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to run migrations: {e}"),
                e,
            )
        })?;

    info!("Schema is up to date");
    Ok(())
}
