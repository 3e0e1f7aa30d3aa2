/// Database migration runner
///
/// The schema ships as sqlx migrations embedded at compile time from
/// `taskdesk-shared/migrations/`.

use sqlx::postgres::PgPool;
use tracing::{info, warn};

/// Applies every migration not yet recorded in `_sqlx_migrations`
///
/// # Errors
///
/// Returns an error if a migration fails to execute or the applied history
/// no longer matches the embedded files.
///
/// # Example
///
/// ```no_run
/// use taskdesk_shared::db::pool::{create_pool, DatabaseConfig};
/// use taskdesk_shared::db::migrations::run_migrations;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
/// run_migrations(&pool).await?;
/// # Ok(())
/// # }
/// ```
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Starting database migrations");

    match sqlx::migrate!("./migrations").run(pool).await {
        Ok(()) => {
            info!("All database migrations completed successfully");
            Ok(())
        }
        Err(e) => {
            warn!("Migration failed: {}", e);
            Err(e)
        }
    }
}
