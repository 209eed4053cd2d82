use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, post},
    Json, Router,
};
use axum_extra::extract::WithRejection;
use validator::Validate;

use super::types::{CreatedResponse, InvitationPath, InviteMemberRequest, OrganizationInvitationPath, OrganizationPath};
use crate::app::{
    db::{self, invitations::Invitation},
    domain::{Email, InvitationStatus, OrganizationRole},
    error::AppError,
    identity::Identity,
    mail::EmailMessage,
    session::AuthenticatedSession,
    tenant::{self, OrganizationInfo},
    AppState,
};

/// How long an invitation stays open: 48 hours.
pub const INVITATION_TTL_MILLIS: i64 = 48 * 60 * 60 * 1000;

fn invitation_not_found() -> AppError {
    AppError::NotFound("Invitation not found".to_string())
}

/// POST /api/organizations/:org_id/invitations — Invite someone by email (owners/admins only).
pub async fn create(
    AuthenticatedSession(identity): AuthenticatedSession,
    State(state): State<AppState>,
    Path(path): Path<OrganizationPath>,
    WithRejection(Json(request), _): WithRejection<Json<InviteMemberRequest>, AppError>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    request.validate().map_err(AppError::from_validation)?;

    let inviter = &identity.user;
    tenant::require_org_manager(&state.db, Some(inviter), &path.org_id).await?;
    if request.role == OrganizationRole::Owner {
        return Err(AppError::Validation(
            "Invitations can only grant the admin or member role".to_string(),
        ));
    }

    let email = Email::parse(&request.email)
        .map_err(|_| AppError::Validation("Invalid email address".to_string()))?;

    if let Some(existing) = db::find_by_email(&state.db, &email).await? {
        if db::organizations::find_member_role(&state.db, &path.org_id, &existing.id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "User is already a member of this organization".to_string(),
            ));
        }
    }

    if db::invitations::has_open_for_email(&state.db, &path.org_id, email.as_str()).await? {
        return Err(AppError::Conflict(
            "User is already invited to this organization".to_string(),
        ));
    }

    let organization = db::organizations::find_by_id(&state.db, &path.org_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Organization not found".to_string()))?;

    let invitation = db::invitations::NewInvitation {
        id: ulid::Ulid::new().to_string(),
        organization_id: organization.id.clone(),
        email: email.as_str().to_string(),
        role: request.role,
        inviter_id: inviter.id.clone(),
        expires_at: db::now_millis() + INVITATION_TTL_MILLIS,
    };

    db::invitations::insert(&state.db, &invitation).await?;

    let link = state.config.invitation_link(&invitation.id);
    let message = EmailMessage::invitation(
        email,
        &organization.name,
        &inviter.email,
        &request.role.to_string(),
        &link,
    );
    if let Err(err) = state.mail.send(&message).await {
        tracing::error!(%err, invitation_id = %invitation.id, organization_id = %organization.id, "failed to send invitation email");
        // An undelivered invitation must not stay open.
        db::invitations::set_status(&state.db, &invitation.id, InvitationStatus::Canceled).await?;
        return Err(AppError::Internal);
    }

    tracing::info!(
        invitation_id = %invitation.id,
        organization_id = %organization.id,
        invited_by = %inviter.email,
        role = %request.role,
        "invitation created"
    );

    Ok((StatusCode::CREATED, Json(CreatedResponse { id: invitation.id })))
}

/// DELETE /api/organizations/:org_id/invitations/:invitation_id — Cancel a pending invitation.
pub async fn cancel(
    AuthenticatedSession(identity): AuthenticatedSession,
    State(state): State<AppState>,
    Path(path): Path<OrganizationInvitationPath>,
) -> Result<StatusCode, AppError> {
    tenant::require_org_manager(&state.db, Some(&identity.user), &path.org_id).await?;

    let invitation = db::invitations::find_by_id(&state.db, &path.invitation_id)
        .await?
        .filter(|inv| inv.organization_id == path.org_id)
        .filter(|inv| inv.status == InvitationStatus::Pending)
        .ok_or_else(invitation_not_found)?;

    db::invitations::set_status(&state.db, &invitation.id, InvitationStatus::Canceled).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Load an invitation the caller may act on: open, and addressed to the caller's email.
async fn load_own_invitation(
    state: &AppState,
    identity: &Identity,
    invitation_id: &str,
) -> Result<Invitation, AppError> {
    let invitation = db::invitations::find_by_id(&state.db, invitation_id)
        .await?
        .filter(|inv| inv.is_open(db::now_millis()))
        .ok_or_else(invitation_not_found)?;

    let recipient = Email::parse(&identity.user.email)
        .map(|email| email.matches(&invitation.email))
        .unwrap_or(false);
    if !recipient {
        return Err(AppError::AccessDenied(
            "You are not the recipient of the invitation".to_string(),
        ));
    }

    Ok(invitation)
}

/// POST /api/invitations/:invitation_id/accept — Join the organization and make it active.
pub async fn accept(
    AuthenticatedSession(identity): AuthenticatedSession,
    State(state): State<AppState>,
    Path(path): Path<InvitationPath>,
) -> Result<Json<OrganizationInfo>, AppError> {
    let invitation = load_own_invitation(&state, &identity, &path.invitation_id).await?;
    let user = &identity.user;

    if db::organizations::find_member_role(&state.db, &invitation.organization_id, &user.id)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(
            "You are already a member of this organization".to_string(),
        ));
    }

    let organization = db::organizations::find_by_id(&state.db, &invitation.organization_id)
        .await?
        .ok_or_else(invitation_not_found)?;

    let mut tx = state.db.begin().await?;
    db::organizations::add_member(&mut *tx, &organization.id, &user.id, invitation.role).await?;
    db::invitations::set_status(&mut *tx, &invitation.id, InvitationStatus::Accepted).await?;
    db::sessions::set_active_organization(&mut *tx, &identity.session.id, Some(&organization.id))
        .await?;
    tx.commit().await?;

    tracing::info!(
        invitation_id = %invitation.id,
        organization_id = %organization.id,
        user_id = %user.id,
        "invitation accepted"
    );

    Ok(Json(organization.into()))
}

/// POST /api/invitations/:invitation_id/reject — Decline an invitation.
pub async fn reject(
    AuthenticatedSession(identity): AuthenticatedSession,
    State(state): State<AppState>,
    Path(path): Path<InvitationPath>,
) -> Result<StatusCode, AppError> {
    let invitation = load_own_invitation(&state, &identity, &path.invitation_id).await?;
    db::invitations::set_status(&state.db, &invitation.id, InvitationStatus::Rejected).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/organizations/:org_id/invitations", post(create))
        .route(
            "/api/organizations/:org_id/invitations/:invitation_id",
            delete(cancel),
        )
        .route("/api/invitations/:invitation_id/accept", post(accept))
        .route("/api/invitations/:invitation_id/reject", post(reject))
}
