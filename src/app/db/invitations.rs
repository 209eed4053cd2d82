use sqlx::{FromRow, SqliteExecutor};

use crate::app::domain::{InvitationStatus, OrganizationRole};

/// Database row for invitations table.
#[derive(Debug, Clone, FromRow)]
pub struct Invitation {
    pub id: String,
    pub organization_id: String,
    pub email: String,
    pub role: OrganizationRole,
    pub status: InvitationStatus,
    pub inviter_id: String,
    pub expires_at: i64,
    pub created_at: i64,
}

impl Invitation {
    /// Pending and not yet expired at `now`.
    pub fn is_open(&self, now: i64) -> bool {
        self.status == InvitationStatus::Pending && self.expires_at > now
    }
}

/// Data structure for inserting a new invitation. Invitations always start pending.
pub struct NewInvitation {
    pub id: String,
    pub organization_id: String,
    pub email: String,
    pub role: OrganizationRole,
    pub inviter_id: String,
    pub expires_at: i64,
}

/// Insert a new pending invitation.
pub async fn insert<'e, E>(
    executor: E,
    invitation: &NewInvitation,
) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query(
        "INSERT INTO invitations (id, organization_id, email, role, status, inviter_id, expires_at, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&invitation.id)
    .bind(&invitation.organization_id)
    .bind(&invitation.email)
    .bind(invitation.role)
    .bind(InvitationStatus::Pending)
    .bind(&invitation.inviter_id)
    .bind(invitation.expires_at)
    .bind(super::now_millis())
    .execute(executor)
    .await?;
    Ok(())
}

/// Find an invitation by ID regardless of status.
pub async fn find_by_id<'e, E>(
    executor: E,
    id: &str,
) -> Result<Option<Invitation>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Invitation>(
        "SELECT id, organization_id, email, role, status, inviter_id, expires_at, created_at FROM invitations WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(executor)
    .await
}

/// Pending, unexpired invitations for an organization, newest first.
pub async fn list_pending_for_org<'e, E>(
    executor: E,
    organization_id: &str,
) -> Result<Vec<Invitation>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Invitation>(
        "SELECT id, organization_id, email, role, status, inviter_id, expires_at, created_at \
         FROM invitations \
         WHERE organization_id = ? AND status = 'pending' AND expires_at > ? \
         ORDER BY created_at DESC",
    )
    .bind(organization_id)
    .bind(super::now_millis())
    .fetch_all(executor)
    .await
}

/// Whether an open invitation already exists for this email in this organization.
pub async fn has_open_for_email<'e, E>(
    executor: E,
    organization_id: &str,
    email: &str,
) -> Result<bool, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let count: i64 = sqlx::query_scalar(
        "SELECT count(*) FROM invitations WHERE organization_id = ? AND email = ? AND status = 'pending' AND expires_at > ?",
    )
    .bind(organization_id)
    .bind(email)
    .bind(super::now_millis())
    .fetch_one(executor)
    .await?;
    Ok(count > 0)
}

/// Move an invitation to a new status.
pub async fn set_status<'e, E>(
    executor: E,
    id: &str,
    status: InvitationStatus,
) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query("UPDATE invitations SET status = ? WHERE id = ?")
        .bind(status)
        .bind(id)
        .execute(executor)
        .await?;
    Ok(())
}
