use actix_session::Session;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;

use crate::auth::{csrf, password, session::{get_user_id, sign_in}};
use crate::config::AppConfig;
use crate::errors::{render, AppError};
use crate::models::admin;
use crate::templates_structs::LoginTemplate;

#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub csrf_token: String,
}

#[derive(Deserialize)]
pub struct CsrfOnly {
    pub csrf_token: String,
}

fn login_form(session: &Session, config: &AppConfig, error: Option<&str>) -> Result<HttpResponse, AppError> {
    let tmpl = LoginTemplate {
        error: error.map(String::from),
        app_name: config.report_context.clone(),
        csrf_token: csrf::get_or_create_token(session),
    };
    render(tmpl)
}

fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header(("Location", location))
        .finish()
}

pub async fn login_page(
    config: web::Data<AppConfig>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    if get_user_id(&session).is_some() {
        return Ok(redirect("/reports/monthly"));
    }
    login_form(&session, &config, None)
}

pub async fn login_submit(
    pool: web::Data<PgPool>,
    config: web::Data<AppConfig>,
    session: Session,
    form: web::Form<LoginForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let Some(found) = admin::find_by_username(&pool, &form.username).await? else {
        log::info!("Failed login for unknown user '{}'", form.username.trim());
        return login_form(&session, &config, Some("Invalid username or password"));
    };

    if !password::verify_password(&form.password, &found.password_hash)? {
        log::info!("Failed login for '{}'", found.username);
        return login_form(&session, &config, Some("Invalid username or password"));
    }

    sign_in(&session, found.id, &found.username)?;
    log::info!("Admin '{}' signed in", found.username);
    Ok(redirect("/reports/monthly"))
}

pub async fn logout(
    session: Session,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    session.purge();
    Ok(redirect("/login"))
}
