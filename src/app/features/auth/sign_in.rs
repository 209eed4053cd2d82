use axum::{extract::State, routing::post, Json, Router};
use axum_extra::extract::{cookie::CookieJar, WithRejection};
use validator::Validate;

use super::{
    service,
    types::{AuthResponse, SignInRequest},
};
use crate::app::{
    domain::{Email, Password},
    error::AppError,
    session, AppState,
};

/// POST /api/auth/sign-in — Verify credentials and open a session.
pub async fn submit(
    State(state): State<AppState>,
    jar: CookieJar,
    WithRejection(Json(request), _): WithRejection<Json<SignInRequest>, AppError>,
) -> Result<(CookieJar, Json<AuthResponse>), AppError> {
    request.validate().map_err(AppError::from_validation)?;

    // A malformed address gets the same answer as a wrong password.
    let email = Email::parse(&request.email)
        .map_err(|_| AppError::Auth("Invalid email or password".to_string()))?;
    let password = Password::for_verification(request.password);

    let signed_in = service::sign_in(&state.db, &state.config, &email, &password).await?;

    let jar = jar.add(session::session_cookie(signed_in.token.clone()));
    Ok((
        jar,
        Json(AuthResponse {
            token: signed_in.token,
            user: signed_in.user.into(),
        }),
    ))
}

/// Sign-in routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/api/auth/sign-in", post(submit))
}
