use sqlx::PgPool;

use crate::errors::AppError;

/// Admin account used for login; includes the password hash.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Admin {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub display_name: String,
}

pub async fn find_by_username(pool: &PgPool, username: &str) -> Result<Option<Admin>, AppError> {
    let admin = sqlx::query_as::<_, Admin>(
        "SELECT id, username, password_hash, display_name FROM admins WHERE username = $1",
    )
    .bind(username.trim())
    .fetch_optional(pool)
    .await?;
    Ok(admin)
}

pub async fn create(
    pool: &PgPool,
    username: &str,
    password_hash: &str,
    display_name: &str,
) -> Result<i64, AppError> {
    let (id,): (i64,) = sqlx::query_as(
        "INSERT INTO admins (username, password_hash, display_name) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(username)
    .bind(password_hash)
    .bind(display_name)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

pub async fn count(pool: &PgPool) -> Result<i64, AppError> {
    let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM admins")
        .fetch_one(pool)
        .await?;
    Ok(n)
}
