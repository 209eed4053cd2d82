use sqlx::{FromRow, SqliteExecutor};

use crate::app::domain::{Email, HashedPassword, UserId};

/// Database row for users table.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub email_verified: bool,
    pub password_hash: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Data structure for inserting a new user.
pub struct NewUser {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub password_hash: HashedPassword,
}

/// Find a user by email address.
pub async fn find_by_email<'e, E>(
    executor: E,
    email: &Email,
) -> Result<Option<User>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, User>(
        "SELECT id, name, email, email_verified, password_hash, created_at, updated_at FROM users WHERE email = ?",
    )
    .bind(email.as_str())
    .fetch_optional(executor)
    .await
}

/// Find a user by ID.
pub async fn find_by_id<'e, E>(
    executor: E,
    user_id: &str,
) -> Result<Option<User>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, User>(
        "SELECT id, name, email, email_verified, password_hash, created_at, updated_at FROM users WHERE id = ?",
    )
    .bind(user_id)
    .fetch_optional(executor)
    .await
}

/// Insert a new user. Email verification is not required to sign in, so the flag starts cleared.
pub async fn insert<'e, E>(
    executor: E,
    user: &NewUser,
) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let now = super::now_millis();

    sqlx::query(
        "INSERT INTO users (id, name, email, email_verified, password_hash, created_at, updated_at) VALUES (?, ?, ?, 0, ?, ?, ?)",
    )
    .bind(user.id.as_str())
    .bind(&user.name)
    .bind(user.email.as_str())
    .bind(user.password_hash.as_str())
    .bind(now)
    .bind(now)
    .execute(executor)
    .await?;

    Ok(())
}

/// Mark a user's email as verified.
pub async fn mark_verified<'e, E>(
    executor: E,
    user_id: &str,
) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query("UPDATE users SET email_verified = 1, updated_at = ? WHERE id = ?")
        .bind(super::now_millis())
        .bind(user_id)
        .execute(executor)
        .await?;
    Ok(())
}
