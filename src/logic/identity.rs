//! Accounts and sessions: signup, credential checks and bearer tokens.

use crate::db::{from_micros, to_micros};
use crate::models::{ServiceError, ServiceResult, Session, User, UserId};
use chrono::{Duration, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

const INVALID_CREDENTIALS: &str = "Invalid email or password";
const INVALID_TOKEN: &str = "Could not validate credentials";

/// Token lifetime and password hashing cost.
#[derive(Clone, Copy, Debug)]
pub struct AuthSettings {
    pub token_ttl: Duration,
    pub bcrypt_cost: u32,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            token_ttl: Duration::minutes(1440),
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: String,
    email: String,
    username: String,
    password_hash: String,
    created_at: i64,
}

impl TryFrom<UserRow> for User {
    type Error = ServiceError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&row.id)
            .map_err(|e| ServiceError::Database(sqlx::Error::Decode(Box::new(e))))?;
        Ok(User {
            id,
            email: row.email,
            username: row.username,
            password_hash: row.password_hash,
            created_at: from_micros(row.created_at),
        })
    }
}

async fn find_user_by_email(pool: &SqlitePool, email: &str) -> ServiceResult<Option<User>> {
    let row: Option<UserRow> = sqlx::query_as(
        "SELECT id, email, username, password_hash, created_at FROM users WHERE email = ?1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;
    row.map(User::try_from).transpose()
}

/// Create an account and its empty player profile in one transaction.
///
/// Email and username must both be unused; each clash has its own message.
/// Clashes are checked before the password is hashed. The transaction opens
/// with the `users` insert, so concurrent signups wait on the write lock
/// instead of failing an upgrade from a stale read.
pub async fn create_account(
    pool: &SqlitePool,
    settings: &AuthSettings,
    email: &str,
    username: &str,
    password: &str,
) -> ServiceResult<User> {
    let email = email.trim();

    let (email_taken, username_taken): (bool, bool) = sqlx::query_as(
        "SELECT EXISTS(SELECT 1 FROM users WHERE email = ?1),
                EXISTS(SELECT 1 FROM users WHERE username = ?2)",
    )
    .bind(email)
    .bind(username)
    .fetch_one(pool)
    .await?;
    if email_taken {
        return Err(ServiceError::conflict("Email already in use"));
    }
    if username_taken {
        return Err(ServiceError::conflict("Username already in use"));
    }

    let user = User {
        id: Uuid::new_v4(),
        email: email.to_string(),
        username: username.to_string(),
        password_hash: hash_password(password, settings.bcrypt_cost).await?,
        // Stored at microsecond precision; keep the returned value identical.
        created_at: from_micros(to_micros(Utc::now())),
    };

    let mut tx = pool.begin().await?;
    sqlx::query(
        "INSERT INTO users (id, email, username, password_hash, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .bind(user.id.to_string())
    .bind(&user.email)
    .bind(&user.username)
    .bind(&user.password_hash)
    .bind(to_micros(user.created_at))
    .execute(&mut *tx)
    .await
    .map_err(unique_violation_as_conflict)?;

    sqlx::query("INSERT INTO players (user_id, username) VALUES (?1, ?2)")
        .bind(user.id.to_string())
        .bind(&user.username)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    log::info!("Account created: username={}", user.username);
    Ok(user)
}

/// A concurrent signup can slip past the pre-check; the unique index catches it.
fn unique_violation_as_conflict(err: sqlx::Error) -> ServiceError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            if db_err.message().contains("users.email") {
                ServiceError::conflict("Email already in use")
            } else {
                ServiceError::conflict("Username already in use")
            }
        }
        _ => ServiceError::Database(err),
    }
}

/// Check an email/password pair. Unknown email and wrong password fail alike.
pub async fn verify_credentials(
    pool: &SqlitePool,
    email: &str,
    password: &str,
) -> ServiceResult<User> {
    let user = find_user_by_email(pool, email.trim())
        .await?
        .ok_or_else(|| ServiceError::unauthorized(INVALID_CREDENTIALS))?;
    if !verify_password(password, &user.password_hash).await? {
        return Err(ServiceError::unauthorized(INVALID_CREDENTIALS));
    }
    Ok(user)
}

/// Start a session for `user_id`, valid for `settings.token_ttl`.
pub async fn issue_token(
    pool: &SqlitePool,
    settings: &AuthSettings,
    user_id: UserId,
) -> ServiceResult<Session> {
    let session = Session {
        token: Uuid::new_v4().simple().to_string(),
        user_id,
        expires_at: from_micros(to_micros(Utc::now() + settings.token_ttl)),
    };
    sqlx::query("INSERT INTO sessions (token, user_id, expires_at) VALUES (?1, ?2, ?3)")
        .bind(&session.token)
        .bind(session.user_id.to_string())
        .bind(to_micros(session.expires_at))
        .execute(pool)
        .await?;
    Ok(session)
}

/// The account behind a live session token.
pub async fn resolve_user_from_token(pool: &SqlitePool, token: &str) -> ServiceResult<User> {
    let row: Option<UserRow> = sqlx::query_as(
        "SELECT u.id, u.email, u.username, u.password_hash, u.created_at
         FROM sessions s
         JOIN users u ON u.id = s.user_id
         WHERE s.token = ?1 AND s.expires_at > ?2",
    )
    .bind(token)
    .bind(to_micros(Utc::now()))
    .fetch_optional(pool)
    .await?;
    row.map(User::try_from)
        .transpose()?
        .ok_or_else(|| ServiceError::unauthorized(INVALID_TOKEN))
}

/// End a session. Returns whether the token existed.
pub async fn revoke_token(pool: &SqlitePool, token: &str) -> ServiceResult<bool> {
    let result = sqlx::query("DELETE FROM sessions WHERE token = ?1")
        .bind(token)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Drop every expired session. Returns how many were removed.
pub async fn purge_expired_sessions(pool: &SqlitePool) -> ServiceResult<u64> {
    let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?1")
        .bind(to_micros(Utc::now()))
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

// bcrypt blocks for a noticeable time; run it on the blocking pool.
async fn hash_password(password: &str, cost: u32) -> ServiceResult<String> {
    let password = password.to_string();
    let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??;
    Ok(hash)
}

async fn verify_password(password: &str, hash: &str) -> ServiceResult<bool> {
    let password = password.to_string();
    let hash = hash.to_string();
    let ok = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await??;
    Ok(ok)
}
