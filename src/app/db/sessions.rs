use rand_core::{OsRng, RngCore};
use sqlx::{FromRow, SqliteExecutor};

/// Database row for sessions table. `id` is the bearer token handed to the client.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub id: String,
    pub user_id: String,
    pub active_organization_id: Option<String>,
    pub expires_at: i64,
    pub created_at: i64,
}

/// 32 random bytes, hex encoded.
fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Create a new session for a user. Returns the session token.
pub async fn create<'e, E>(
    executor: E,
    user_id: &str,
    active_organization_id: Option<&str>,
    expires_at: i64,
) -> Result<String, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let token = generate_token();

    sqlx::query(
        "INSERT INTO sessions (id, user_id, active_organization_id, expires_at, created_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&token)
    .bind(user_id)
    .bind(active_organization_id)
    .bind(expires_at)
    .bind(super::now_millis())
    .execute(executor)
    .await?;

    Ok(token)
}

/// Find a valid (non-expired) session by token.
pub async fn find_valid<'e, E>(
    executor: E,
    token: &str,
) -> Result<Option<Session>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Session>(
        "SELECT id, user_id, active_organization_id, expires_at, created_at FROM sessions WHERE id = ? AND expires_at > ?",
    )
    .bind(token)
    .bind(super::now_millis())
    .fetch_optional(executor)
    .await
}

/// Point a session at a different organization (or none).
pub async fn set_active_organization<'e, E>(
    executor: E,
    token: &str,
    organization_id: Option<&str>,
) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query("UPDATE sessions SET active_organization_id = ? WHERE id = ?")
        .bind(organization_id)
        .bind(token)
        .execute(executor)
        .await?;
    Ok(())
}

/// Clear the active organization on every session of a user that points at it.
/// Used when the user leaves or is removed from that organization.
pub async fn clear_active_organization_for_user<'e, E>(
    executor: E,
    user_id: &str,
    organization_id: &str,
) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query(
        "UPDATE sessions SET active_organization_id = NULL WHERE user_id = ? AND active_organization_id = ?",
    )
    .bind(user_id)
    .bind(organization_id)
    .execute(executor)
    .await?;
    Ok(())
}

/// Delete a session by token.
pub async fn delete<'e, E>(
    executor: E,
    token: &str,
) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query("DELETE FROM sessions WHERE id = ?")
        .bind(token)
        .execute(executor)
        .await?;
    Ok(())
}
