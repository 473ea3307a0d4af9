use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One member's mark in a roll call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollEntry {
    pub member_id: i64,
    pub present: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RollCallRequest {
    pub entries: Vec<RollEntry>,
}

/// Attendance row joined with the member's name.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct AttendanceRecord {
    pub member_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub date: NaiveDate,
    pub present: bool,
}

/// Outcome of recording a roll call.
#[derive(Debug, Clone, Serialize)]
pub struct RollCallResult {
    pub date: NaiveDate,
    pub recorded: usize,
    pub present: usize,
    pub session_marked_held: bool,
}
