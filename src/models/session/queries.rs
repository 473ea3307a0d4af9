use chrono::NaiveDate;
use sqlx::PgPool;

use super::types::*;
use crate::errors::AppError;
use crate::report::ReportPeriod;

const SELECT_SESSION: &str = "\
    SELECT id, date, status, notes, cancellation_reason, cancelled_by, cancelled_at \
    FROM sessions";

/// Schedule a session. Fails with a unique violation if the date is taken.
pub async fn schedule(pool: &PgPool, date: NaiveDate, notes: &str) -> Result<i64, AppError> {
    let (id,): (i64,) = sqlx::query_as(
        "INSERT INTO sessions (date, status, notes) VALUES ($1, 'scheduled', $2) RETURNING id",
    )
    .bind(date)
    .bind(notes.trim())
    .fetch_one(pool)
    .await?;
    Ok(id)
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Session>, AppError> {
    let sql = format!("{SELECT_SESSION} WHERE id = $1");
    let session = sqlx::query_as::<_, Session>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(session)
}

pub async fn find_for_month(pool: &PgPool, period: &ReportPeriod) -> Result<Vec<Session>, AppError> {
    let sql = format!("{SELECT_SESSION} WHERE date BETWEEN $1 AND $2 ORDER BY date");
    let sessions = sqlx::query_as::<_, Session>(&sql)
        .bind(period.first_day())
        .bind(period.last_day())
        .fetch_all(pool)
        .await?;
    Ok(sessions)
}

/// Cancelled sessions in a calendar year, oldest first.
pub async fn find_cancellations(pool: &PgPool, year: i32) -> Result<Vec<Session>, AppError> {
    let sql = format!(
        "{SELECT_SESSION} WHERE status = 'cancelled' \
           AND EXTRACT(YEAR FROM date)::INTEGER = $1 \
         ORDER BY date"
    );
    let sessions = sqlx::query_as::<_, Session>(&sql)
        .bind(year)
        .fetch_all(pool)
        .await?;
    Ok(sessions)
}

/// Mark a session held. Cancelled sessions are left alone; returns whether a row changed.
pub async fn mark_held(pool: &PgPool, id: i64) -> Result<bool, AppError> {
    let result = sqlx::query(
        "UPDATE sessions SET status = 'held' WHERE id = $1 AND status <> 'cancelled'",
    )
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Cancel a session, possibly after it was held. Returns whether a row changed.
pub async fn cancel(pool: &PgPool, id: i64, reason: &str, cancelled_by: &str) -> Result<bool, AppError> {
    let result = sqlx::query(
        "UPDATE sessions SET status = 'cancelled', cancellation_reason = $2, \
                cancelled_by = $3, cancelled_at = NOW() \
         WHERE id = $1",
    )
    .bind(id)
    .bind(reason.trim())
    .bind(cancelled_by)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}
