//! Identity resolution: session token → authenticated user, or nobody.
//!
//! Resolution never fails for a missing, unknown or expired token; those all
//! mean "anonymous". Only storage errors propagate.

use sqlx::SqlitePool;

use crate::app::db;

/// A caller with a live session.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user: db::User,
    pub session: db::sessions::Session,
}

/// Look up the session and its user. `None` when the token is absent, unknown or expired.
pub async fn resolve(
    pool: &SqlitePool,
    token: Option<&str>,
) -> Result<Option<Identity>, sqlx::Error> {
    let Some(token) = token.filter(|t| !t.is_empty()) else {
        return Ok(None);
    };

    let Some(session) = db::sessions::find_valid(pool, token).await? else {
        return Ok(None);
    };

    let user = db::users::find_by_id(pool, &session.user_id).await?;
    Ok(user.map(|user| Identity { user, session }))
}

/// The authenticated user for a session token, or `None`.
pub async fn authenticated_user(
    pool: &SqlitePool,
    token: Option<&str>,
) -> Result<Option<db::User>, sqlx::Error> {
    Ok(resolve(pool, token).await?.map(|identity| identity.user))
}

pub fn is_authenticated(user: Option<&db::User>) -> bool {
    user.is_some()
}
