//! Session cookie and quiz lookup.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use services::{SessionKey, StoredQuiz};

use crate::error::AppError;
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "rccm_session";

#[must_use]
pub fn session_cookie(key: SessionKey, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, key.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

#[must_use]
pub fn session_key(jar: &CookieJar) -> Option<SessionKey> {
    jar.get(SESSION_COOKIE)?.value().parse().ok()
}

/// The live quiz of this browser, if any.
#[must_use]
pub fn load_quiz(state: &AppState, jar: &CookieJar) -> Option<(SessionKey, StoredQuiz)> {
    let key = session_key(jar)?;
    let stored = state.services.sessions().get(key)?;
    Some((key, stored))
}

/// # Errors
///
/// Returns `AppError::BadRequest` if `token` does not match the quiz.
pub fn check_csrf(stored: &StoredQuiz, token: &str) -> Result<(), AppError> {
    if stored.verify_csrf(token) {
        Ok(())
    } else {
        Err(AppError::BadRequest(
            "フォームの有効期限が切れています。もう一度お試しください。".to_string(),
        ))
    }
}
