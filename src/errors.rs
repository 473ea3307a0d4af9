use actix_web::{HttpResponse, ResponseError};
use askama::Template;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Db(sqlx::Error),
    Migrate(sqlx::migrate::MigrateError),
    Template(askama::Error),
    Render(String),
    Hash(String),
    Session(String),
    Csrf,
    InvalidPeriod(String),
    Validation(Vec<String>),
    NotFound,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Db(e) => write!(f, "Database error: {e}"),
            AppError::Migrate(e) => write!(f, "Migration error: {e}"),
            AppError::Template(e) => write!(f, "Template error: {e}"),
            AppError::Render(e) => write!(f, "Render error: {e}"),
            AppError::Hash(e) => write!(f, "Hash error: {e}"),
            AppError::Session(e) => write!(f, "Session error: {e}"),
            AppError::Csrf => write!(f, "Invalid or missing CSRF token"),
            AppError::InvalidPeriod(e) => write!(f, "Invalid period: {e}"),
            AppError::Validation(errors) => write!(f, "Validation failed: {}", errors.join("; ")),
            AppError::NotFound => write!(f, "Not found"),
        }
    }
}

impl std::error::Error for AppError {}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::NotFound => HttpResponse::NotFound().json(serde_json::json!({
                "error": "Not found"
            })),
            AppError::Csrf => HttpResponse::Forbidden().body("Invalid or missing CSRF token"),
            AppError::InvalidPeriod(msg) => HttpResponse::BadRequest().json(serde_json::json!({
                "error": "Invalid period",
                "details": msg,
            })),
            AppError::Validation(errors) => HttpResponse::BadRequest().json(serde_json::json!({
                "error": "Validation failed",
                "details": errors.join("; "),
            })),
            _ => {
                log::error!("{self}");
                HttpResponse::InternalServerError().body("Internal Server Error")
            }
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Db(e)
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(e: sqlx::migrate::MigrateError) -> Self {
        AppError::Migrate(e)
    }
}

impl From<askama::Error> for AppError {
    fn from(e: askama::Error) -> Self {
        AppError::Template(e)
    }
}

/// Render an Askama template into a 200 HTML response.
pub fn render<T: Template>(tmpl: T) -> Result<HttpResponse, AppError> {
    let html = tmpl.render()?;
    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html))
}

/// True when a database error is a unique-constraint violation.
pub fn is_unique_violation(e: &AppError) -> bool {
    match e {
        AppError::Db(sqlx::Error::Database(db)) => db.is_unique_violation(),
        _ => false,
    }
}

/// True when a write referenced a row that does not exist.
pub fn is_foreign_key_violation(e: &AppError) -> bool {
    match e {
        AppError::Db(sqlx::Error::Database(db)) => db.is_foreign_key_violation(),
        _ => false,
    }
}
