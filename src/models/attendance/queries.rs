use chrono::NaiveDate;
use sqlx::PgPool;

use super::types::*;
use crate::errors::AppError;

/// Record a roll call for `date` in one transaction.
///
/// Existing rows for the same member and date are overwritten. A scheduled
/// session on that date becomes `held`; cancelled sessions are not touched.
pub async fn record_roll_call(
    pool: &PgPool,
    date: NaiveDate,
    entries: &[RollEntry],
) -> Result<RollCallResult, AppError> {
    let mut tx = pool.begin().await?;

    for entry in entries {
        sqlx::query(
            "INSERT INTO attendance (member_id, date, present) VALUES ($1, $2, $3) \
             ON CONFLICT (member_id, date) DO UPDATE SET present = EXCLUDED.present",
        )
        .bind(entry.member_id)
        .bind(date)
        .bind(entry.present)
        .execute(&mut *tx)
        .await?;
    }

    let held = sqlx::query(
        "UPDATE sessions SET status = 'held' WHERE date = $1 AND status = 'scheduled'",
    )
    .bind(date)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(RollCallResult {
        date,
        recorded: entries.len(),
        present: entries.iter().filter(|e| e.present).count(),
        session_marked_held: held.rows_affected() > 0,
    })
}

/// The roll for a date, ordered by member name.
pub async fn find_for_date(pool: &PgPool, date: NaiveDate) -> Result<Vec<AttendanceRecord>, AppError> {
    let rows = sqlx::query_as::<_, AttendanceRecord>(
        "SELECT a.member_id, m.first_name, m.last_name, a.date, a.present \
         FROM attendance a \
         JOIN members m ON m.id = a.member_id \
         WHERE a.date = $1 \
         ORDER BY m.last_name, m.first_name, m.id",
    )
    .bind(date)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
