// Template context structures for Askama templates.

use actix_session::Session;
use askama::Template;

use crate::auth::csrf;
use crate::auth::session::get_username;
use crate::errors::AppError;
use crate::report::{AggregationReport, BucketMap, Category, ReportPeriod};

/// Common context shared by all authenticated pages.
pub struct PageContext {
    pub username: String,
    pub app_name: String,
    pub csrf_token: String,
}

impl PageContext {
    pub fn build(session: &Session, app_name: &str) -> Result<Self, AppError> {
        let username = get_username(session)?;
        let csrf_token = csrf::get_or_create_token(session);
        Ok(Self {
            username,
            app_name: app_name.to_string(),
            csrf_token,
        })
    }
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    pub app_name: String,
    pub csrf_token: String,
}

/// One `label: count` row of a report table.
pub struct ReportRow {
    pub label: String,
    pub count: u64,
    pub percent: String,
}

pub struct ReportSection {
    pub title: String,
    pub total: u64,
    pub rows: Vec<ReportRow>,
}

impl ReportSection {
    pub fn from_buckets(title: &str, buckets: &BucketMap) -> Self {
        let total = buckets.total();
        let rows = buckets
            .iter()
            .map(|(label, count)| ReportRow {
                label: label.to_string(),
                count,
                percent: if total == 0 {
                    "0%".to_string()
                } else {
                    format!("{:.1}%", count as f64 / total as f64 * 100.0)
                },
            })
            .collect();
        Self { title: title.to_string(), total, rows }
    }
}

#[derive(Template)]
#[template(path = "reports/monthly.html")]
pub struct MonthlyReportTemplate {
    pub ctx: PageContext,
    pub period_label: String,
    pub month: u32,
    pub year: i32,
    pub attendee_count: u64,
    pub sections: Vec<ReportSection>,
}

impl MonthlyReportTemplate {
    pub fn new(ctx: PageContext, period: &ReportPeriod, report: &AggregationReport) -> Self {
        let sections = Category::ALL
            .iter()
            .map(|c| (c, report.stats.get(*c)))
            .filter(|(_, buckets)| !buckets.is_empty())
            .map(|(c, buckets)| ReportSection::from_buckets(c.title(), buckets))
            .collect();
        Self {
            ctx,
            period_label: period.label(),
            month: period.month(),
            year: period.year(),
            attendee_count: report.attendee_count(),
            sections,
        }
    }
}
