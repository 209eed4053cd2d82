use axum::{
    extract::{Path, State},
    routing::post,
    Json, Router,
};

use super::types::OrganizationPath;
use crate::app::{
    db,
    error::AppError,
    session::AuthenticatedSession,
    tenant::{self, OrganizationInfo},
    AppState,
};

/// POST /api/organizations/:org_id/activate — Make this the session's active organization.
pub async fn activate(
    AuthenticatedSession(identity): AuthenticatedSession,
    State(state): State<AppState>,
    Path(path): Path<OrganizationPath>,
) -> Result<Json<OrganizationInfo>, AppError> {
    tenant::require_org_access(&state.db, Some(&identity.user), &path.org_id).await?;

    let organization = db::organizations::find_by_id(&state.db, &path.org_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Organization not found".to_string()))?;

    db::sessions::set_active_organization(&state.db, &identity.session.id, Some(&organization.id))
        .await?;

    Ok(Json(organization.into()))
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/organizations/:org_id/activate", post(activate))
}
