use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use axum_extra::extract::{cookie::CookieJar, WithRejection};
use validator::Validate;

use super::{
    service,
    types::{AuthResponse, SignUpRequest},
};
use crate::app::{
    domain::{Email, Password},
    error::AppError,
    session, AppState,
};

/// POST /api/auth/sign-up — Create an account and sign in.
pub async fn submit(
    State(state): State<AppState>,
    jar: CookieJar,
    WithRejection(Json(request), _): WithRejection<Json<SignUpRequest>, AppError>,
) -> Result<(StatusCode, CookieJar, Json<AuthResponse>), AppError> {
    request.validate().map_err(AppError::from_validation)?;

    let email = Email::parse(&request.email)
        .map_err(|_| AppError::Validation("Invalid email address".to_string()))?;
    let password = Password::new(request.password).map_err(|e| {
        AppError::Validation(
            e.message
                .map(|m| m.to_string())
                .unwrap_or_else(|| "Invalid password".to_string()),
        )
    })?;

    let signed_in = service::sign_up(&state.db, &state.config, &request.name, &email, &password).await?;

    let jar = jar.add(session::session_cookie(signed_in.token.clone()));
    Ok((
        StatusCode::CREATED,
        jar,
        Json(AuthResponse {
            token: signed_in.token,
            user: signed_in.user.into(),
        }),
    ))
}

/// Sign-up routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/api/auth/sign-up", post(submit))
}
