pub mod attendance_handlers;
pub mod auth_handlers;
pub mod member_handlers;
pub mod report_handlers;
pub mod session_handlers;

use actix_web::{middleware::from_fn, web, HttpResponse};

use crate::auth::middleware::{require_auth, require_json_content_type};

/// Register every route. Shared by `main` and the integration tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        // Public routes
        .route("/login", web::get().to(auth_handlers::login_page))
        .route("/login", web::post().to(auth_handlers::login_submit))
        .route("/", web::get().to(|| async {
            HttpResponse::SeeOther()
                .insert_header(("Location", "/reports/monthly"))
                .finish()
        }))
        // Protected routes
        .service(
            web::scope("")
                .wrap(from_fn(require_auth))
                .route("/logout", web::post().to(auth_handlers::logout))
                .route("/reports/monthly", web::get().to(report_handlers::monthly_page))
                .service(
                    web::scope("/api")
                        .wrap(from_fn(require_json_content_type))
                        // Reports
                        .route("/reports/monthly", web::get().to(report_handlers::monthly_json))
                        .route("/reports/monthly/pdf", web::get().to(report_handlers::monthly_pdf))
                        // Members
                        .route("/members", web::get().to(member_handlers::list))
                        .route("/members", web::post().to(member_handlers::create))
                        .route("/members/vocabulary", web::get().to(member_handlers::vocabulary))
                        .route("/members/{id}", web::get().to(member_handlers::read))
                        .route("/members/{id}", web::put().to(member_handlers::update))
                        .route("/members/{id}", web::delete().to(member_handlers::delete))
                        .route("/members/{id}/conditions", web::get().to(member_handlers::list_conditions))
                        .route("/members/{id}/conditions", web::post().to(member_handlers::add_condition))
                        .route(
                            "/members/{id}/conditions/{cid}",
                            web::delete().to(member_handlers::remove_condition),
                        )
                        // Sessions - /sessions/cancellations before /sessions/{id}
                        .route("/sessions", web::get().to(session_handlers::list))
                        .route("/sessions", web::post().to(session_handlers::schedule))
                        .route("/sessions/cancellations", web::get().to(session_handlers::cancellations))
                        .route("/sessions/{id}/held", web::post().to(session_handlers::mark_held))
                        .route("/sessions/{id}/cancel", web::post().to(session_handlers::cancel))
                        // Attendance
                        .route("/attendance/{date}", web::get().to(attendance_handlers::roll))
                        .route("/attendance/{date}", web::post().to(attendance_handlers::record)),
                ),
        );
}
