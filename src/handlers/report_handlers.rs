use actix_session::Session;
use actix_web::{web, HttpResponse};
use chrono::{Datelike, NaiveDate, Utc};
use serde::Deserialize;
use sqlx::PgPool;

use crate::config::AppConfig;
use crate::errors::{render, AppError};
use crate::report::{
    generate_monthly_report_at, render_report, report_filename, RenderOptions, ReportPeriod,
    ReportStyle,
};
use crate::templates_structs::{MonthlyReportTemplate, PageContext};

#[derive(Debug, Default, Deserialize)]
pub struct PeriodQuery {
    pub month: Option<u32>,
    pub year: Option<i32>,
    pub style: Option<String>,
}

impl PeriodQuery {
    /// Missing fields fall back to the month containing `today`.
    pub fn period(&self, today: NaiveDate) -> Result<ReportPeriod, AppError> {
        ReportPeriod::new(
            self.month.unwrap_or(today.month()),
            self.year.unwrap_or(today.year()),
        )
    }

    pub fn style(&self) -> Result<ReportStyle, AppError> {
        match self.style.as_deref() {
            None => Ok(ReportStyle::default()),
            Some(s) => ReportStyle::parse(s).ok_or_else(|| {
                AppError::Validation(vec!["style must be 'charts' or 'text'".to_string()])
            }),
        }
    }
}

/// GET /api/reports/monthly
pub async fn monthly_json(
    pool: web::Data<PgPool>,
    query: web::Query<PeriodQuery>,
) -> Result<HttpResponse, AppError> {
    let today = Utc::now().date_naive();
    let period = query.period(today)?;
    let report = generate_monthly_report_at(pool.get_ref(), &period, today).await?;
    Ok(HttpResponse::Ok().json(report))
}

/// GET /api/reports/monthly/pdf
pub async fn monthly_pdf(
    pool: web::Data<PgPool>,
    config: web::Data<AppConfig>,
    query: web::Query<PeriodQuery>,
) -> Result<HttpResponse, AppError> {
    let today = Utc::now().date_naive();
    let period = query.period(today)?;
    let options = RenderOptions {
        context: config.report_context.clone(),
        style: query.style()?,
        include_locations: true,
    };

    let report = generate_monthly_report_at(pool.get_ref(), &period, today).await?;
    let bytes = render_report(&report, &options)?;
    let filename = report_filename(&options.context, period.year(), period.month());
    log::info!("Rendered {filename} ({} bytes)", bytes.len());

    Ok(HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{filename}\""),
        ))
        .body(bytes))
}

/// GET /reports/monthly - HTML summary
pub async fn monthly_page(
    pool: web::Data<PgPool>,
    config: web::Data<AppConfig>,
    session: Session,
    query: web::Query<PeriodQuery>,
) -> Result<HttpResponse, AppError> {
    let ctx = PageContext::build(&session, &config.report_context)?;
    let today = Utc::now().date_naive();
    let period = query.period(today)?;
    let report = generate_monthly_report_at(pool.get_ref(), &period, today).await?;
    render(MonthlyReportTemplate::new(ctx, &period, &report))
}
