use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::errors::AppError;

/// One attending member with the demographic fields a report needs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct AttendingMember {
    pub member_id: i64,
    pub gender: Option<String>,
    pub birth_month: Option<i32>,
    pub birth_year: Option<i32>,
    pub ethnicity: Option<String>,
    pub sexual_orientation: Option<String>,
    pub employment_status: Option<String>,
    pub postcode: Option<String>,
    pub address: Option<String>,
    /// Distinct condition tags, in storage order.
    pub conditions: Vec<String>,
}

/// Read access the aggregator needs from storage.
#[async_trait]
pub trait AttendanceSource: Send + Sync {
    /// Members with at least one `present` attendance row between `start` and
    /// `end` inclusive, one row per member.
    async fn fetch_attending_members_with_conditions(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<AttendingMember>, AppError>;
}

#[async_trait]
impl AttendanceSource for PgPool {
    async fn fetch_attending_members_with_conditions(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<AttendingMember>, AppError> {
        let rows = sqlx::query_as::<_, AttendingMember>(
            "SELECT m.id AS member_id, m.gender, m.birth_month, m.birth_year, \
                    m.ethnicity, m.sexual_orientation, m.employment_status, \
                    m.postcode, m.address, \
                    COALESCE( \
                        array_agg(DISTINCT mc.condition) FILTER (WHERE mc.condition IS NOT NULL), \
                        '{}' \
                    ) AS conditions \
             FROM members m \
             LEFT JOIN medical_conditions mc ON mc.member_id = m.id \
             WHERE EXISTS ( \
                 SELECT 1 FROM attendance a \
                 WHERE a.member_id = m.id \
                   AND a.present \
                   AND a.date BETWEEN $1 AND $2) \
             GROUP BY m.id \
             ORDER BY m.id",
        )
        .bind(start.date_naive())
        .bind(end.date_naive())
        .fetch_all(self)
        .await?;

        Ok(rows)
    }
}
