//! HTTP routing tests through the real route table.
//!
//! The auth guard tests use a lazy pool that never connects. The signed-in
//! flow needs `TEST_DATABASE_URL` and is skipped otherwise.

mod common;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use regex::Regex;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use rollbook::auth::password;
use rollbook::config::AppConfig;
use rollbook::db::seed_admin;
use rollbook::handlers;
use common::*;

fn test_config() -> AppConfig {
    AppConfig::from_lookup(|key| match key {
        "REPORT_CONTEXT" => Some("Youth Club".to_string()),
        _ => None,
    })
}

fn lazy_pool() -> PgPool {
    PgPoolOptions::new()
        .connect_lazy("postgres://localhost/rollbook_unused")
        .expect("lazy pool")
}

macro_rules! app {
    ($pool:expr) => {
        test::init_service(
            App::new()
                .wrap(
                    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
                        .cookie_secure(false)
                        .build(),
                )
                .app_data(web::Data::new($pool))
                .app_data(web::Data::new(test_config()))
                .configure(handlers::configure),
        )
        .await
    };
}

fn session_cookie<B>(resp: &actix_web::dev::ServiceResponse<B>) -> Option<Cookie<'static>> {
    resp.response()
        .cookies()
        .find(|c| c.name() == "id")
        .map(|c| c.into_owned())
}

// ────────────────────────────────────────────────────────────────────
// Auth guard
// ────────────────────────────────────────────────────────────────────

#[actix_web::test]
async fn test_pages_redirect_to_login() {
    let app = app!(lazy_pool());

    let req = test::TestRequest::get().uri("/reports/monthly").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/login");
}

#[actix_web::test]
async fn test_api_requires_session() {
    let app = app!(lazy_pool());

    for uri in ["/api/reports/monthly?month=6&year=2025", "/api/members", "/api/sessions"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{uri}");
    }
}

#[actix_web::test]
async fn test_login_page_renders_form() {
    let app = app!(lazy_pool());

    let req = test::TestRequest::get().uri("/login").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(session_cookie(&resp).is_some());

    let body = test::read_body(resp).await;
    let html = String::from_utf8_lossy(&body);
    assert!(html.contains("Youth Club"));
    assert!(html.contains(r#"name="csrf_token""#));
}

#[actix_web::test]
async fn test_login_without_csrf_token_is_forbidden() {
    let app = app!(lazy_pool());

    let req = test::TestRequest::post()
        .uri("/login")
        .set_form([("username", "admin"), ("password", "x"), ("csrf_token", "nope")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

// ────────────────────────────────────────────────────────────────────
// Signed-in flow
// ────────────────────────────────────────────────────────────────────

#[actix_web::test]
async fn test_signed_in_admin_can_use_the_api() {
    let Some(db) = setup_test_db().await else { return };
    let pool = db.pool().clone();

    let hash = password::hash_password(ADMIN_PASS).unwrap();
    seed_admin(&pool, &hash).await.unwrap();
    let app = app!(pool.clone());

    // Fetch the login form for a CSRF token.
    let resp = test::call_service(&app, test::TestRequest::get().uri("/login").to_request()).await;
    let cookie = session_cookie(&resp).expect("session cookie");
    let html = String::from_utf8_lossy(&test::read_body(resp).await).to_string();
    let token = Regex::new(r#"name="csrf_token" value="([0-9a-f]{64})""#)
        .unwrap()
        .captures(&html)
        .expect("csrf token in form")[1]
        .to_string();

    // Wrong password re-renders the form.
    let req = test::TestRequest::post()
        .uri("/login")
        .cookie(cookie.clone())
        .set_form([("username", ADMIN_USER), ("password", "wrong"), ("csrf_token", token.as_str())])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = String::from_utf8_lossy(&test::read_body(resp).await).to_string();
    assert!(html.contains("Invalid username or password"));

    let req = test::TestRequest::post()
        .uri("/login")
        .cookie(cookie.clone())
        .set_form([("username", ADMIN_USER), ("password", ADMIN_PASS), ("csrf_token", token.as_str())])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let cookie = session_cookie(&resp).expect("signed-in cookie");

    // A signed-in admin is sent straight past the login form.
    let req = test::TestRequest::get().uri("/login").cookie(cookie.clone()).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/reports/monthly");

    // Mutations must be JSON.
    let req = test::TestRequest::post()
        .uri("/api/members")
        .cookie(cookie.clone())
        .set_form([("first_name", "Ada")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/api/members")
        .cookie(cookie.clone())
        .set_json(serde_json::json!({ "first_name": "Ada", "gender": "Female", "postcode": "ws4 1ab" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(created["postcode"], "WS4 1AB");
    let member_id = created["id"].as_i64().unwrap();

    let req = test::TestRequest::post()
        .uri("/api/members")
        .cookie(cookie.clone())
        .set_json(serde_json::json!({ "first_name": "", "birth_month": 13 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/api/attendance/2025-06-14")
        .cookie(cookie.clone())
        .set_json(serde_json::json!({ "entries": [{ "member_id": member_id, "present": true }] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/api/reports/monthly?month=6&year=2025")
        .cookie(cookie.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let report: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(report["month"], 6);
    assert_eq!(report["stats"]["genders"]["Female"], 1);
    assert_eq!(report["stats"]["locations"]["Walsall"], 1);

    let req = test::TestRequest::get()
        .uri("/api/reports/monthly?month=13&year=2025")
        .cookie(cookie.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let query = serde_urlencoded::to_string([("month", "6"), ("year", "2025"), ("style", "text")])
        .unwrap();
    let req = test::TestRequest::get()
        .uri(&format!("/api/reports/monthly/pdf?{query}"))
        .cookie(cookie.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get(header::CONTENT_TYPE).unwrap(), "application/pdf");
    let disposition = resp
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.contains("youth-club-report-2025-06.pdf"), "{disposition}");
    let pdf = test::read_body(resp).await;
    assert!(pdf.starts_with(b"%PDF-"));

    // Cancelled sessions cannot be marked held; unknown ids are 404.
    let req = test::TestRequest::post()
        .uri("/api/sessions")
        .cookie(cookie.clone())
        .set_json(serde_json::json!({ "date": "2025-06-21", "notes": "Picnic" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let scheduled: serde_json::Value = test::read_body_json(resp).await;
    let session_id = scheduled["id"].as_i64().unwrap();

    let req = test::TestRequest::post()
        .uri(&format!("/api/sessions/{session_id}/cancel"))
        .cookie(cookie.clone())
        .set_json(serde_json::json!({ "reason": "Rain" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let cancelled: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(cancelled["status"], "cancelled");
    assert_eq!(cancelled["cancelled_by"], ADMIN_USER);

    for (id, expected) in [(session_id, StatusCode::BAD_REQUEST), (session_id + 1000, StatusCode::NOT_FOUND)] {
        let req = test::TestRequest::post()
            .uri(&format!("/api/sessions/{id}/held"))
            .cookie(cookie.clone())
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), expected, "session {id}");
    }

    let req = test::TestRequest::get()
        .uri("/reports/monthly?month=6&year=2025")
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = String::from_utf8_lossy(&test::read_body(resp).await).to_string();
    assert!(html.contains("June 2025"));
    assert!(html.contains("Walsall"));

    db.teardown().await;
}
