use actix_session::Session;

use crate::errors::AppError;

pub fn get_user_id(session: &Session) -> Option<i64> {
    session.get::<i64>("user_id").unwrap_or(None)
}

pub fn get_username(session: &Session) -> Result<String, AppError> {
    match session.get::<String>("username") {
        Ok(Some(username)) => Ok(username),
        Ok(None) => Err(AppError::Session("No username in session".to_string())),
        Err(e) => Err(AppError::Session(e.to_string())),
    }
}

/// Store the logged-in admin in the session.
pub fn sign_in(session: &Session, user_id: i64, username: &str) -> Result<(), AppError> {
    session.renew();
    session
        .insert("user_id", user_id)
        .and_then(|_| session.insert("username", username))
        .map_err(|e| AppError::Session(e.to_string()))
}
