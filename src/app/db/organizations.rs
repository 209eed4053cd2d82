use sqlx::{FromRow, SqliteExecutor};

use crate::app::domain::{OrganizationId, OrganizationRole, OrganizationSlug};

/// Database row for organizations table.
#[derive(Debug, Clone, FromRow)]
pub struct Organization {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Data structure for inserting a new organization.
pub struct NewOrganization {
    pub id: OrganizationId,
    pub name: String,
    pub slug: OrganizationSlug,
}

/// A membership joined with the member's user record.
#[derive(Debug, Clone, FromRow)]
pub struct Member {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub role: OrganizationRole,
    pub created_at: i64,
}

/// Find an organization by ID.
pub async fn find_by_id<'e, E>(
    executor: E,
    organization_id: &str,
) -> Result<Option<Organization>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Organization>(
        "SELECT id, name, slug, created_at, updated_at FROM organizations WHERE id = ?",
    )
    .bind(organization_id)
    .fetch_optional(executor)
    .await
}

/// Whether an organization already uses this slug.
pub async fn slug_taken<'e, E>(
    executor: E,
    slug: &OrganizationSlug,
) -> Result<bool, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let count: i64 = sqlx::query_scalar("SELECT count(*) FROM organizations WHERE slug = ?")
        .bind(slug.as_str())
        .fetch_one(executor)
        .await?;
    Ok(count > 0)
}

/// Insert a new organization.
pub async fn insert<'e, E>(
    executor: E,
    organization: &NewOrganization,
) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let now = super::now_millis();
    sqlx::query(
        "INSERT INTO organizations (id, name, slug, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(organization.id.as_str())
    .bind(&organization.name)
    .bind(organization.slug.as_str())
    .bind(now)
    .bind(now)
    .execute(executor)
    .await?;
    Ok(())
}

/// Add a user to an organization with a specific role.
pub async fn add_member<'e, E>(
    executor: E,
    organization_id: &str,
    user_id: &str,
    role: OrganizationRole,
) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query(
        "INSERT INTO organization_members (organization_id, user_id, role, created_at) VALUES (?, ?, ?, ?)",
    )
    .bind(organization_id)
    .bind(user_id)
    .bind(role)
    .bind(super::now_millis())
    .execute(executor)
    .await?;
    Ok(())
}

/// Remove a membership. Returns whether a row was deleted.
pub async fn remove_member<'e, E>(
    executor: E,
    organization_id: &str,
    user_id: &str,
) -> Result<bool, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query(
        "DELETE FROM organization_members WHERE organization_id = ? AND user_id = ?",
    )
    .bind(organization_id)
    .bind(user_id)
    .execute(executor)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Find a member's role in an organization. Returns None if not a member.
pub async fn find_member_role<'e, E>(
    executor: E,
    organization_id: &str,
    user_id: &str,
) -> Result<Option<OrganizationRole>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_scalar::<_, OrganizationRole>(
        "SELECT role FROM organization_members WHERE organization_id = ? AND user_id = ?",
    )
    .bind(organization_id)
    .bind(user_id)
    .fetch_optional(executor)
    .await
}

/// Organizations a user belongs to, resolved through their membership rows.
pub async fn list_for_user<'e, E>(
    executor: E,
    user_id: &str,
) -> Result<Vec<Organization>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Organization>(
        "SELECT o.id, o.name, o.slug, o.created_at, o.updated_at \
         FROM organization_members m \
         JOIN organizations o ON o.id = m.organization_id \
         WHERE m.user_id = ? \
         ORDER BY m.created_at ASC",
    )
    .bind(user_id)
    .fetch_all(executor)
    .await
}

/// Number of organizations a user belongs to.
pub async fn count_for_user<'e, E>(
    executor: E,
    user_id: &str,
) -> Result<i64, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_scalar("SELECT count(*) FROM organization_members WHERE user_id = ?")
        .bind(user_id)
        .fetch_one(executor)
        .await
}

/// Members of an organization with their user details, oldest first.
pub async fn list_members<'e, E>(
    executor: E,
    organization_id: &str,
) -> Result<Vec<Member>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Member>(
        "SELECT m.user_id, u.name, u.email, m.role, m.created_at \
         FROM organization_members m \
         JOIN users u ON u.id = m.user_id \
         WHERE m.organization_id = ? \
         ORDER BY m.created_at ASC",
    )
    .bind(organization_id)
    .fetch_all(executor)
    .await
}

/// Number of owners in an organization.
pub async fn count_owners<'e, E>(
    executor: E,
    organization_id: &str,
) -> Result<i64, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_scalar(
        "SELECT count(*) FROM organization_members WHERE organization_id = ? AND role = 'owner'",
    )
    .bind(organization_id)
    .fetch_one(executor)
    .await
}
