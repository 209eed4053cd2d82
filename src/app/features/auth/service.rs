use sqlx::SqlitePool;

use crate::app::{
    config::Config,
    db,
    domain::{Email, HashedPassword, Password, UserId},
    error::AppError,
};

const MILLIS_PER_DAY: i64 = 86_400_000;

/// A user with a freshly issued session token.
#[derive(Debug)]
pub struct SignedIn {
    pub user: db::User,
    pub token: String,
}

fn session_expiry(config: &Config) -> i64 {
    db::now_millis() + config.session_ttl_days * MILLIS_PER_DAY
}

fn account_exists() -> AppError {
    AppError::Auth(
        "Unable to create account. If you already have an account, please sign in.".to_string(),
    )
}

/// A concurrent sign-up can win the race past the email lookup; its unique
/// violation reads the same as the lookup hit.
fn insert_user_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => account_exists(),
        _ => AppError::Database(err),
    }
}

/// Sign up a new user and open their first session.
pub async fn sign_up(
    pool: &SqlitePool,
    config: &Config,
    name: &str,
    email: &Email,
    password: &Password,
) -> Result<SignedIn, AppError> {
    if db::find_by_email(pool, email).await?.is_some() {
        return Err(account_exists());
    }

    let password_hash = HashedPassword::from_password(password).map_err(|_| AppError::Internal)?;
    let new_user = db::NewUser {
        id: UserId::new(),
        name: name.trim().to_string(),
        email: email.clone(),
        password_hash,
    };
    let user_id = new_user.id.as_str();

    let mut tx = pool.begin().await?;
    db::users::insert(&mut *tx, &new_user)
        .await
        .map_err(insert_user_error)?;
    let token = db::sessions::create(&mut *tx, &user_id, None, session_expiry(config)).await?;
    let user = db::users::find_by_id(&mut *tx, &user_id)
        .await?
        .ok_or(AppError::Internal)?;
    tx.commit().await?;

    tracing::info!(user_id = %user.id, "user signed up");
    Ok(SignedIn { user, token })
}

/// Verify credentials and open a new session.
pub async fn sign_in(
    pool: &SqlitePool,
    config: &Config,
    email: &Email,
    password: &Password,
) -> Result<SignedIn, AppError> {
    let invalid = || AppError::Auth("Invalid email or password".to_string());

    let user = db::find_by_email(pool, email).await?.ok_or_else(invalid)?;

    HashedPassword::from_string(user.password_hash.clone())
        .verify(password)
        .map_err(|_| invalid())?;

    let token = db::sessions::create(pool, &user.id, None, session_expiry(config)).await?;
    Ok(SignedIn { user, token })
}
