//! Accounts, sessions and the auth request/response bodies.

use crate::models::error::ServiceError;
use crate::models::player::UserId;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

pub const MIN_PASSWORD_LEN: usize = 8;

/// A stored account. The password hash never leaves the crate boundary in responses.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn to_auth_user(&self) -> AuthUser {
        AuthUser {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
        }
    }
}

/// Public view of an account.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: UserId,
    pub username: String,
    pub email: String,
}

/// Bearer token handed out by signup/login.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Session {
    pub token: String,
    pub user_id: UserId,
    pub expires_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: AuthUser,
    pub token: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub username: String,
    pub password: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

fn email_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern compiles")
    })
}

fn username_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9_]{3,20}$").expect("username pattern compiles")
    })
}

impl SignupRequest {
    /// Field checks done at the HTTP boundary, before any account lookup.
    pub fn validate(&self) -> Result<(), ServiceError> {
        if !email_pattern().is_match(self.email.trim()) {
            return Err(ServiceError::validation("email is not a valid address"));
        }
        if !username_pattern().is_match(&self.username) {
            return Err(ServiceError::validation(
                "username must be 3-20 characters of letters, digits or underscore",
            ));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ServiceError::validation(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        Ok(())
    }
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), ServiceError> {
        if !email_pattern().is_match(self.email.trim()) {
            return Err(ServiceError::validation("email is not a valid address"));
        }
        Ok(())
    }
}
