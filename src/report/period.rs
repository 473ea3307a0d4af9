use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::errors::AppError;

const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];

/// A calendar month used to scope a report.
///
/// The window is inclusive on both ends: from the first day at 00:00:00 UTC
/// to the last day at 23:59:59.999 UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportPeriod {
    month: u32,
    year: i32,
    first_day: NaiveDate,
    last_day: NaiveDate,
}

impl ReportPeriod {
    pub fn new(month: u32, year: i32) -> Result<Self, AppError> {
        if !(1..=12).contains(&month) {
            return Err(AppError::InvalidPeriod(format!(
                "month must be between 1 and 12, got {month}"
            )));
        }
        let out_of_range = || AppError::InvalidPeriod(format!("year {year} is out of range"));

        let first_day = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(out_of_range)?;
        let next_month = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        };
        let last_day = next_month
            .and_then(|d| d.pred_opt())
            .ok_or_else(out_of_range)?;

        Ok(Self { month, year, first_day, last_day })
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    pub fn last_day(&self) -> NaiveDate {
        self.last_day
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.first_day.and_time(NaiveTime::default()).and_utc()
    }

    pub fn end(&self) -> DateTime<Utc> {
        let end_of_day = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or_default();
        self.last_day.and_time(end_of_day).and_utc()
    }

    /// True when `date` falls inside the window.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.first_day && date <= self.last_day
    }

    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES[(self.month - 1) as usize]
    }

    /// "June 2025"
    pub fn label(&self) -> String {
        format!("{} {}", self.month_name(), self.year)
    }
}
