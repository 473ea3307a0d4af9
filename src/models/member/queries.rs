use sqlx::PgPool;

use super::types::*;
use crate::errors::AppError;

const SELECT_MEMBER: &str = "\
    SELECT id, first_name, last_name, gender, birth_month, birth_year, \
           ethnicity, sexual_orientation, employment_status, postcode, \
           address, email, phone, created_at, updated_at \
    FROM members";

pub async fn create(pool: &PgPool, new: &NewMember) -> Result<i64, AppError> {
    let (id,): (i64,) = sqlx::query_as(
        "INSERT INTO members \
             (first_name, last_name, gender, birth_month, birth_year, ethnicity, \
              sexual_orientation, employment_status, postcode, address, email, phone) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
         RETURNING id",
    )
    .bind(&new.first_name)
    .bind(&new.last_name)
    .bind(&new.gender)
    .bind(new.birth_month)
    .bind(new.birth_year)
    .bind(&new.ethnicity)
    .bind(&new.sexual_orientation)
    .bind(&new.employment_status)
    .bind(&new.postcode)
    .bind(&new.address)
    .bind(&new.email)
    .bind(&new.phone)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Member>, AppError> {
    let sql = format!("{SELECT_MEMBER} WHERE id = $1");
    let member = sqlx::query_as::<_, Member>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(member)
}

/// Members ordered by name, optionally filtered by a name search.
pub async fn find_paginated(
    pool: &PgPool,
    search: Option<&str>,
    page: i64,
    per_page: i64,
) -> Result<MemberPage, AppError> {
    let page = page.max(1);
    let per_page = per_page.clamp(1, 100);
    let offset = (page - 1) * per_page;
    let pattern = search
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| format!("%{s}%"));

    let (total,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM members m \
         WHERE $1::TEXT IS NULL \
            OR (m.first_name || ' ' || m.last_name) ILIKE $1",
    )
    .bind(&pattern)
    .fetch_one(pool)
    .await?;

    let items = sqlx::query_as::<_, MemberListItem>(
        "SELECT m.id, m.first_name, m.last_name, m.postcode, \
                COUNT(mc.id) AS condition_count \
         FROM members m \
         LEFT JOIN medical_conditions mc ON mc.member_id = m.id \
         WHERE $1::TEXT IS NULL \
            OR (m.first_name || ' ' || m.last_name) ILIKE $1 \
         GROUP BY m.id \
         ORDER BY m.last_name, m.first_name, m.id \
         LIMIT $2 OFFSET $3",
    )
    .bind(&pattern)
    .bind(per_page)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(MemberPage { items, page, per_page, total })
}

/// Returns false when no member has this id.
pub async fn update(pool: &PgPool, id: i64, new: &NewMember) -> Result<bool, AppError> {
    let result = sqlx::query(
        "UPDATE members SET \
             first_name = $2, last_name = $3, gender = $4, birth_month = $5, \
             birth_year = $6, ethnicity = $7, sexual_orientation = $8, \
             employment_status = $9, postcode = $10, address = $11, \
             email = $12, phone = $13, updated_at = NOW() \
         WHERE id = $1",
    )
    .bind(id)
    .bind(&new.first_name)
    .bind(&new.last_name)
    .bind(&new.gender)
    .bind(new.birth_month)
    .bind(new.birth_year)
    .bind(&new.ethnicity)
    .bind(&new.sexual_orientation)
    .bind(&new.employment_status)
    .bind(&new.postcode)
    .bind(&new.address)
    .bind(&new.email)
    .bind(&new.phone)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Hard delete; conditions and attendance go with the member.
pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM members WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
