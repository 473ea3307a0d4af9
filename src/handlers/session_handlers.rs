use actix_session::Session as CookieSession;
use actix_web::{web, HttpResponse};
use chrono::{Datelike, Utc};
use serde::Deserialize;
use sqlx::PgPool;

use crate::auth::session::get_username;
use crate::auth::validate;
use crate::errors::{is_unique_violation, AppError};
use crate::models::session::{self, CancelRequest, ScheduleRequest};
use crate::report::ReportPeriod;

#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    pub month: Option<u32>,
    pub year: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct YearQuery {
    pub year: Option<i32>,
}

/// GET /api/sessions?month=&year= (defaults to the current month)
pub async fn list(
    pool: web::Data<PgPool>,
    query: web::Query<MonthQuery>,
) -> Result<HttpResponse, AppError> {
    let today = Utc::now().date_naive();
    let period = ReportPeriod::new(
        query.month.unwrap_or(today.month()),
        query.year.unwrap_or(today.year()),
    )?;
    let sessions = session::find_for_month(&pool, &period).await?;
    Ok(HttpResponse::Ok().json(sessions))
}

/// POST /api/sessions
pub async fn schedule(
    pool: web::Data<PgPool>,
    body: web::Json<ScheduleRequest>,
) -> Result<HttpResponse, AppError> {
    if let Some(err) = validate::validate_optional(&body.notes, "Notes", 1000) {
        return Err(AppError::Validation(vec![err]));
    }

    let id = match session::schedule(&pool, body.date, &body.notes).await {
        Ok(id) => id,
        Err(e) if is_unique_violation(&e) => {
            return Err(AppError::Validation(vec![format!(
                "A session already exists on {}",
                body.date
            )]));
        }
        Err(e) => return Err(e),
    };
    log::info!("Scheduled session {id} on {}", body.date);

    let created = session::find_by_id(&pool, id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Created().json(created))
}

/// POST /api/sessions/{id}/held
pub async fn mark_held(
    pool: web::Data<PgPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    if !session::mark_held(&pool, id).await? {
        // No row changed: either the id is unknown or the session is cancelled.
        session::find_by_id(&pool, id)
            .await?
            .ok_or(AppError::NotFound)?;
        return Err(AppError::Validation(vec![
            "A cancelled session cannot be marked as held".to_string(),
        ]));
    }

    let updated = session::find_by_id(&pool, id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(updated))
}

/// POST /api/sessions/{id}/cancel
pub async fn cancel(
    pool: web::Data<PgPool>,
    cookie: CookieSession,
    path: web::Path<i64>,
    body: web::Json<CancelRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    if let Some(err) = validate::validate_required(&body.reason, "Cancellation reason", 500) {
        return Err(AppError::Validation(vec![err]));
    }

    let cancelled_by = get_username(&cookie)?;
    if !session::cancel(&pool, id, &body.reason, &cancelled_by).await? {
        return Err(AppError::NotFound);
    }
    log::info!("Session {id} cancelled by {cancelled_by}");

    let updated = session::find_by_id(&pool, id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(updated))
}

/// GET /api/sessions/cancellations?year= (defaults to the current year)
pub async fn cancellations(
    pool: web::Data<PgPool>,
    query: web::Query<YearQuery>,
) -> Result<HttpResponse, AppError> {
    let year = query.year.unwrap_or_else(|| Utc::now().year());
    let sessions = session::find_cancellations(&pool, year).await?;
    Ok(HttpResponse::Ok().json(sessions))
}
