//! Tenant isolation enforcement.
//!
//! **Rule**: Never trust a client-supplied organization id. Check membership
//! on every read and write scoped to an organization.

use serde::Serialize;
use sqlx::SqlitePool;

use crate::app::{db, domain::OrganizationRole, error::AppError};

/// Public summary of an organization the caller belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrganizationInfo {
    pub id: String,
    pub name: String,
    pub slug: String,
}

impl From<db::organizations::Organization> for OrganizationInfo {
    fn from(org: db::organizations::Organization) -> Self {
        Self {
            id: org.id,
            name: org.name,
            slug: org.slug,
        }
    }
}

/// The caller together with the organizations their memberships resolve to.
#[derive(Debug)]
pub struct UserOrganizations<'a> {
    pub user: Option<&'a db::User>,
    pub organizations: Vec<OrganizationInfo>,
}

/// List the organizations a user belongs to. An anonymous caller belongs to none.
pub async fn user_organizations<'a>(
    pool: &SqlitePool,
    user: Option<&'a db::User>,
) -> Result<UserOrganizations<'a>, AppError> {
    let Some(current) = user else {
        return Ok(UserOrganizations {
            user: None,
            organizations: Vec::new(),
        });
    };

    let organizations = db::organizations::list_for_user(pool, &current.id)
        .await?
        .into_iter()
        .map(OrganizationInfo::from)
        .collect();

    Ok(UserOrganizations {
        user,
        organizations,
    })
}

/// Whether the user belongs to at least one organization.
pub async fn has_user_organizations(
    pool: &SqlitePool,
    user: Option<&db::User>,
) -> Result<bool, AppError> {
    let UserOrganizations { organizations, .. } = user_organizations(pool, user).await?;
    Ok(!organizations.is_empty())
}

/// Require an authenticated caller who is a member of `organization_id`.
/// Returns the member's role.
///
/// - no caller → `Unauthorized`
/// - caller outside the organization → `AccessDenied("Access denied to organization")`
pub async fn require_org_access(
    pool: &SqlitePool,
    user: Option<&db::User>,
    organization_id: &str,
) -> Result<OrganizationRole, AppError> {
    let user = user.ok_or(AppError::Unauthorized)?;

    match db::organizations::find_member_role(pool, organization_id, &user.id).await? {
        Some(role) => Ok(role),
        None => {
            tracing::debug!(user_id = %user.id, organization_id, "organization access denied");
            Err(AppError::access_denied())
        }
    }
}

/// Like [`require_org_access`], additionally requiring an owner or admin.
pub async fn require_org_manager(
    pool: &SqlitePool,
    user: Option<&db::User>,
    organization_id: &str,
) -> Result<OrganizationRole, AppError> {
    let role = require_org_access(pool, user, organization_id).await?;
    if !role.can_manage_members() {
        return Err(AppError::AccessDenied(
            "Only owners and admins can manage members".to_string(),
        ));
    }
    Ok(role)
}
