use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, post},
    Router,
};

use super::types::{MemberPath, OrganizationPath};
use crate::app::{
    db,
    domain::OrganizationRole,
    error::AppError,
    session::AuthenticatedSession,
    tenant,
    AppState,
};

fn only_owner_cannot_leave() -> AppError {
    AppError::Validation("You cannot leave the organization as the only owner".to_string())
}

/// Delete the membership and detach any session that had the organization active.
/// The owner count is taken after the delete inside the same transaction, so two
/// owners leaving at once cannot both succeed.
async fn drop_membership(
    pool: &sqlx::SqlitePool,
    organization_id: &str,
    user_id: &str,
    role: OrganizationRole,
) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;
    let removed = db::organizations::remove_member(&mut *tx, organization_id, user_id).await?;
    if !removed {
        return Err(AppError::NotFound("Member not found".to_string()));
    }
    if role == OrganizationRole::Owner
        && db::organizations::count_owners(&mut *tx, organization_id).await? == 0
    {
        return Err(only_owner_cannot_leave());
    }
    db::sessions::clear_active_organization_for_user(&mut *tx, user_id, organization_id).await?;
    tx.commit().await?;
    Ok(())
}

/// DELETE /api/organizations/:org_id/members/:user_id — Remove another member (owners/admins only).
pub async fn remove(
    AuthenticatedSession(identity): AuthenticatedSession,
    State(state): State<AppState>,
    Path(path): Path<MemberPath>,
) -> Result<StatusCode, AppError> {
    let caller_role = tenant::require_org_manager(&state.db, Some(&identity.user), &path.org_id).await?;

    if path.user_id == identity.user.id {
        return Err(AppError::Validation(
            "Use leave to remove yourself from an organization".to_string(),
        ));
    }

    let target_role = db::organizations::find_member_role(&state.db, &path.org_id, &path.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Member not found".to_string()))?;

    if target_role == OrganizationRole::Owner && caller_role != OrganizationRole::Owner {
        return Err(AppError::AccessDenied("Only owners can remove an owner".to_string()));
    }

    drop_membership(&state.db, &path.org_id, &path.user_id, target_role).await?;

    tracing::info!(
        organization_id = %path.org_id,
        user_id = %path.user_id,
        removed_by = %identity.user.id,
        "member removed"
    );

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/organizations/:org_id/leave — Leave an organization. The last owner cannot leave.
pub async fn leave(
    AuthenticatedSession(identity): AuthenticatedSession,
    State(state): State<AppState>,
    Path(path): Path<OrganizationPath>,
) -> Result<StatusCode, AppError> {
    let role = tenant::require_org_access(&state.db, Some(&identity.user), &path.org_id).await?;

    if role == OrganizationRole::Owner
        && db::organizations::count_owners(&state.db, &path.org_id).await? <= 1
    {
        return Err(only_owner_cannot_leave());
    }

    drop_membership(&state.db, &path.org_id, &identity.user.id, role).await?;

    tracing::info!(organization_id = %path.org_id, user_id = %identity.user.id, "member left");

    Ok(StatusCode::NO_CONTENT)
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/organizations/:org_id/members/:user_id", delete(remove))
        .route("/api/organizations/:org_id/leave", post(leave))
}
