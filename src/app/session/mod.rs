//! Session cookie handling and the request extractors built on it.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::app::{
    db,
    error::AppError,
    identity::{self, Identity},
    AppState,
};

pub const SESSION_COOKIE: &str = "session_id";

pub fn session_cookie(token: impl Into<String>) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token.into()))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .build()
}

pub fn clear_session_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .removal()
        .into()
}

/// Session token from the `session_id` cookie, falling back to `Authorization: Bearer`.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        if !cookie.value().is_empty() {
            return Some(cookie.value().to_string());
        }
    }

    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

/// The caller's identity, if any. Never rejects; authorization decisions are
/// left to the tenancy guard so it can report "Unauthorized" itself.
pub struct CurrentUser(pub Option<Identity>);

impl CurrentUser {
    pub fn user(&self) -> Option<&db::User> {
        self.0.as_ref().map(|identity| &identity.user)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = session_token(&parts.headers);
        let identity = identity::resolve(&state.db, token.as_deref()).await?;
        Ok(CurrentUser(identity))
    }
}

/// A caller with a live session. Rejects with 401 otherwise.
pub struct AuthenticatedSession(pub Identity);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let CurrentUser(identity) = CurrentUser::from_request_parts(parts, state).await?;
        identity.map(AuthenticatedSession).ok_or(AppError::Unauthorized)
    }
}
