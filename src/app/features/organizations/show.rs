use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use super::types::{FullOrganizationResponse, OrganizationPath};
use crate::app::{db, error::AppError, session::CurrentUser, tenant, AppState};

/// GET /api/organizations/:org_id — Organization with its members and pending invitations.
pub async fn show(
    current: CurrentUser,
    State(state): State<AppState>,
    Path(path): Path<OrganizationPath>,
) -> Result<Json<FullOrganizationResponse>, AppError> {
    tenant::require_org_access(&state.db, current.user(), &path.org_id).await?;

    let organization = db::organizations::find_by_id(&state.db, &path.org_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Organization not found".to_string()))?;

    let members = db::organizations::list_members(&state.db, &organization.id).await?;
    let invitations = db::invitations::list_pending_for_org(&state.db, &organization.id).await?;

    Ok(Json(FullOrganizationResponse {
        id: organization.id,
        name: organization.name,
        slug: organization.slug,
        created_at: organization.created_at,
        members: members.into_iter().map(Into::into).collect(),
        invitations: invitations.into_iter().map(Into::into).collect(),
    }))
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/organizations/:org_id", get(show))
}
