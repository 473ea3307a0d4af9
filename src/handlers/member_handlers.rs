use actix_web::{web, HttpResponse};
use chrono::{Datelike, Utc};
use serde::Deserialize;
use sqlx::PgPool;

use crate::auth::validate;
use crate::errors::AppError;
use crate::models::member::{
    self, ConditionRequest, MemberRequest, CONDITION_SUGGESTIONS, EMPLOYMENT_STATUSES,
    ETHNICITIES, GENDERS, SEXUAL_ORIENTATIONS,
};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub q: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// GET /api/members - paginated list, optional name search in `q`
pub async fn list(
    pool: web::Data<PgPool>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, AppError> {
    let page = member::find_paginated(
        &pool,
        query.q.as_deref(),
        query.page.unwrap_or(1),
        query.per_page.unwrap_or(25),
    )
    .await?;
    Ok(HttpResponse::Ok().json(page))
}

/// GET /api/members/vocabulary - allowed values for the enumerated fields
pub async fn vocabulary() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "genders": GENDERS,
        "ethnicities": ETHNICITIES,
        "sexual_orientations": SEXUAL_ORIENTATIONS,
        "employment_statuses": EMPLOYMENT_STATUSES,
        "condition_suggestions": CONDITION_SUGGESTIONS,
    }))
}

/// GET /api/members/{id}
pub async fn read(
    pool: web::Data<PgPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let found = member::find_by_id(&pool, path.into_inner())
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(found))
}

fn validated(body: MemberRequest) -> Result<member::NewMember, AppError> {
    let errors = body.validate(Utc::now().year());
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }
    Ok(body.into_new_member())
}

/// POST /api/members
pub async fn create(
    pool: web::Data<PgPool>,
    body: web::Json<MemberRequest>,
) -> Result<HttpResponse, AppError> {
    let new = validated(body.into_inner())?;
    let id = member::create(&pool, &new).await?;
    log::info!("Created member {id}");

    let created = member::find_by_id(&pool, id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Created().json(created))
}

/// PUT /api/members/{id}
pub async fn update(
    pool: web::Data<PgPool>,
    path: web::Path<i64>,
    body: web::Json<MemberRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let new = validated(body.into_inner())?;
    if !member::update(&pool, id, &new).await? {
        return Err(AppError::NotFound);
    }

    let updated = member::find_by_id(&pool, id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(updated))
}

/// DELETE /api/members/{id}
pub async fn delete(
    pool: web::Data<PgPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    if !member::delete(&pool, id).await? {
        return Err(AppError::NotFound);
    }
    log::info!("Deleted member {id}");
    Ok(HttpResponse::NoContent().finish())
}

/// GET /api/members/{id}/conditions
pub async fn list_conditions(
    pool: web::Data<PgPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let member_id = path.into_inner();
    if member::find_by_id(&pool, member_id).await?.is_none() {
        return Err(AppError::NotFound);
    }
    let conditions = member::find_conditions(&pool, member_id).await?;
    Ok(HttpResponse::Ok().json(conditions))
}

/// POST /api/members/{id}/conditions
pub async fn add_condition(
    pool: web::Data<PgPool>,
    path: web::Path<i64>,
    body: web::Json<ConditionRequest>,
) -> Result<HttpResponse, AppError> {
    let member_id = path.into_inner();
    if let Some(err) = validate::validate_required(&body.condition, "Condition", 200) {
        return Err(AppError::Validation(vec![err]));
    }
    if member::find_by_id(&pool, member_id).await?.is_none() {
        return Err(AppError::NotFound);
    }

    member::add_condition(&pool, member_id, &body.condition).await?;
    let conditions = member::find_conditions(&pool, member_id).await?;
    Ok(HttpResponse::Created().json(conditions))
}

/// DELETE /api/members/{id}/conditions/{cid}
pub async fn remove_condition(
    pool: web::Data<PgPool>,
    path: web::Path<(i64, i64)>,
) -> Result<HttpResponse, AppError> {
    let (member_id, condition_id) = path.into_inner();
    if !member::remove_condition(&pool, member_id, condition_id).await? {
        return Err(AppError::NotFound);
    }
    Ok(HttpResponse::NoContent().finish())
}
