use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::app::{
    db,
    domain::{InvitationStatus, OrganizationRole},
};

/// Path parameters for routes scoped to one organization.
#[derive(Debug, Deserialize)]
pub struct OrganizationPath {
    pub org_id: String,
}

/// Path parameters for DELETE /api/organizations/:org_id/members/:user_id.
#[derive(Debug, Deserialize)]
pub struct MemberPath {
    pub org_id: String,
    pub user_id: String,
}

/// Path parameters for DELETE /api/organizations/:org_id/invitations/:invitation_id.
#[derive(Debug, Deserialize)]
pub struct OrganizationInvitationPath {
    pub org_id: String,
    pub invitation_id: String,
}

/// Path parameters for /api/invitations/:invitation_id/*.
#[derive(Debug, Deserialize)]
pub struct InvitationPath {
    pub invitation_id: String,
}

/// Request body for POST /api/organizations.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrganizationRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1–255 characters"))]
    pub name: String,
    pub slug: String,
}

/// Request body for POST /api/organizations/:org_id/invitations.
#[derive(Debug, Deserialize, Validate)]
pub struct InviteMemberRequest {
    #[validate(length(min = 1, max = 254))]
    pub email: String,
    pub role: OrganizationRole,
}

/// Response carrying the id of a created row.
#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberResponse {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub role: OrganizationRole,
    pub created_at: i64,
}

impl From<db::organizations::Member> for MemberResponse {
    fn from(member: db::organizations::Member) -> Self {
        Self {
            user_id: member.user_id,
            name: member.name,
            email: member.email,
            role: member.role,
            created_at: member.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationResponse {
    pub id: String,
    pub organization_id: String,
    pub email: String,
    pub role: OrganizationRole,
    pub status: InvitationStatus,
    pub inviter_id: String,
    pub expires_at: i64,
    pub created_at: i64,
}

impl From<db::invitations::Invitation> for InvitationResponse {
    fn from(invitation: db::invitations::Invitation) -> Self {
        Self {
            id: invitation.id,
            organization_id: invitation.organization_id,
            email: invitation.email,
            role: invitation.role,
            status: invitation.status,
            inviter_id: invitation.inviter_id,
            expires_at: invitation.expires_at,
            created_at: invitation.created_at,
        }
    }
}

/// Response for GET /api/organizations/:org_id.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FullOrganizationResponse {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub created_at: i64,
    pub members: Vec<MemberResponse>,
    pub invitations: Vec<InvitationResponse>,
}
