//! Errors returned by the leaderboard, identity and player operations.

use thiserror::Error;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Malformed or out-of-range input, rejected at the boundary.
    #[error("{0}")]
    Validation(String),
    /// Well-formed request the operation cannot act on.
    #[error("{0}")]
    BadRequest(String),
    /// The operation references a user or player that does not exist.
    #[error("{0}")]
    NotFound(String),
    /// Duplicate email or username on signup.
    #[error("{0}")]
    Conflict(String),
    /// Bad credentials, or a missing, unknown or expired token.
    #[error("{0}")]
    Unauthorized(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("password hashing error: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),
    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    /// Short machine-readable kind used as the `error` field of response bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::BadRequest(_) => "bad_request",
            Self::NotFound(_) => "not_found",
            Self::Conflict(_) => "conflict",
            Self::Unauthorized(_) => "unauthorized",
            Self::Database(_) | Self::Migration(_) | Self::PasswordHash(_) | Self::Task(_) => {
                "internal_error"
            }
        }
    }

    /// True for failures that are the server's fault rather than the caller's.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::Database(_) | Self::Migration(_) | Self::PasswordHash(_) | Self::Task(_)
        )
    }
}
