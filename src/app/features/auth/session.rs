use axum::{routing::get, Json, Router};

use super::types::{SessionInfo, SessionResponse};
use crate::app::{session::CurrentUser, AppState};

/// GET /api/auth/session — The current user and session, or `null`.
pub async fn show(CurrentUser(identity): CurrentUser) -> Json<Option<SessionResponse>> {
    Json(identity.map(|identity| SessionResponse {
        session: SessionInfo {
            expires_at: identity.session.expires_at,
            active_organization_id: identity.session.active_organization_id,
        },
        user: identity.user.into(),
    }))
}

/// Session routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/api/auth/session", get(show))
}
