use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
    Router,
};
use axum_extra::extract::cookie::CookieJar;

use crate::app::{db, error::AppError, session, AppState};

/// POST /api/auth/sign-out — End the current session. Succeeds without one.
pub async fn submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
) -> Result<(CookieJar, StatusCode), AppError> {
    if let Some(token) = session::session_token(&headers) {
        db::sessions::delete(&state.db, &token).await?;
    }

    let jar = jar.add(session::clear_session_cookie());
    Ok((jar, StatusCode::NO_CONTENT))
}

/// Sign-out routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/api/auth/sign-out", post(submit))
}
