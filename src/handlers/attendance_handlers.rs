use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use sqlx::PgPool;

use crate::errors::{is_foreign_key_violation, AppError};
use crate::models::attendance::{self, RollCallRequest};

/// GET /api/attendance/{date}
pub async fn roll(
    pool: web::Data<PgPool>,
    path: web::Path<NaiveDate>,
) -> Result<HttpResponse, AppError> {
    let records = attendance::find_for_date(&pool, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(records))
}

/// POST /api/attendance/{date}
pub async fn record(
    pool: web::Data<PgPool>,
    path: web::Path<NaiveDate>,
    body: web::Json<RollCallRequest>,
) -> Result<HttpResponse, AppError> {
    let date = path.into_inner();
    match attendance::record_roll_call(&pool, date, &body.entries).await {
        Ok(result) => {
            log::info!(
                "Recorded roll call for {date}: {} of {} present",
                result.present,
                result.recorded
            );
            Ok(HttpResponse::Ok().json(result))
        }
        Err(e) if is_foreign_key_violation(&e) => Err(AppError::Validation(vec![
            "Roll call references a member that does not exist".to_string(),
        ])),
        Err(e) => Err(e),
    }
}
