use actix_session::SessionExt;
use actix_web::{
    Error, HttpResponse,
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
};

use super::session::get_user_id;

/// Rejects requests without a logged-in admin.
/// API routes get a 401 JSON body; pages are redirected to /login.
pub async fn require_auth(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let session = req.get_session();
    let has_user = get_user_id(&session).is_some();

    if !has_user {
        let response = if req.path().starts_with("/api/") {
            HttpResponse::Unauthorized().json(serde_json::json!({
                "error": "Authentication required"
            }))
        } else {
            HttpResponse::SeeOther()
                .insert_header(("Location", "/login"))
                .finish()
        };
        return Ok(req.into_response(response).map_into_right_body());
    }

    next.call(req).await.map(|res| res.map_into_left_body())
}

/// Mutating API requests must be JSON; browsers cannot send cross-origin
/// JSON with cookies from a plain form, so this doubles as a CSRF guard.
pub async fn require_json_content_type(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let method = req.method().clone();

    if method == actix_web::http::Method::POST || method == actix_web::http::Method::PUT {
        let content_type = req
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        if !content_type.starts_with("application/json") {
            let body = serde_json::json!({
                "error": "Content-Type must be application/json for mutation requests"
            });
            let response = HttpResponse::BadRequest().json(body);
            return Ok(req.into_response(response).map_into_right_body());
        }
    }

    next.call(req).await.map(|res| res.map_into_left_body())
}
