use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::AppConfig;
use crate::errors::AppError;
use crate::models::admin;

/// Versioned schema under `migrations/`.
pub static MIGRATOR: Migrator = sqlx::migrate!();

pub async fn init_pool(config: &AppConfig) -> Result<PgPool, AppError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.database_url)
        .await?;
    Ok(pool)
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    MIGRATOR.run(pool).await?;
    log::info!("Database migrations complete");
    Ok(())
}

/// Create the `admin` account if no admin exists yet.
pub async fn seed_admin(pool: &PgPool, admin_password_hash: &str) -> Result<(), AppError> {
    let count = admin::count(pool).await?;
    if count > 0 {
        log::info!("Database already has {count} admin account(s), skipping seed");
        return Ok(());
    }

    admin::create(pool, "admin", admin_password_hash, "Administrator").await?;
    log::info!("Seeded default admin account");
    Ok(())
}
