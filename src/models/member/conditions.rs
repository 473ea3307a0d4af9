use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::errors::AppError;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct MedicalCondition {
    pub id: i64,
    pub member_id: i64,
    pub condition: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConditionRequest {
    pub condition: String,
}

/// Tag a member with a condition. Adding an existing tag returns its id.
pub async fn add_condition(pool: &PgPool, member_id: i64, condition: &str) -> Result<i64, AppError> {
    let (id,): (i64,) = sqlx::query_as(
        "INSERT INTO medical_conditions (member_id, condition) VALUES ($1, $2) \
         ON CONFLICT (member_id, condition) DO UPDATE SET condition = EXCLUDED.condition \
         RETURNING id",
    )
    .bind(member_id)
    .bind(condition.trim())
    .fetch_one(pool)
    .await?;
    Ok(id)
}

pub async fn find_conditions(pool: &PgPool, member_id: i64) -> Result<Vec<MedicalCondition>, AppError> {
    let rows = sqlx::query_as::<_, MedicalCondition>(
        "SELECT id, member_id, condition FROM medical_conditions \
         WHERE member_id = $1 ORDER BY condition",
    )
    .bind(member_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn remove_condition(pool: &PgPool, member_id: i64, condition_id: i64) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM medical_conditions WHERE id = $1 AND member_id = $2")
        .bind(condition_id)
        .bind(member_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
