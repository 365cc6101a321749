//! Leaderboard rows, pages and the query parameters that select them.

use crate::models::error::ServiceError;
use crate::models::mode::GameMode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Largest page a leaderboard request may ask for.
pub const MAX_LEADERBOARD_LIMIT: u32 = 100;
/// Largest number of live games a request may ask for.
pub const MAX_LIVE_GAMES_LIMIT: u32 = 50;

fn default_limit() -> u32 {
    10
}

/// One ranked row: a user's best score under the requested filter.
/// Derived on read, never stored.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// 1-based position in the full sorted leaderboard (not in the page).
    pub rank: u64,
    pub username: String,
    pub score: u32,
    /// Most recent score submission by this user under the filter.
    pub date: DateTime<Utc>,
}

/// A page of the leaderboard plus the number of distinct ranked users.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardPage {
    pub entries: Vec<LeaderboardEntry>,
    pub total: u64,
}

/// Query string of `GET /api/game/leaderboard`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize)]
pub struct LeaderboardQuery {
    pub mode: Option<GameMode>,
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
}

impl Default for LeaderboardQuery {
    fn default() -> Self {
        Self {
            mode: None,
            limit: default_limit(),
            offset: 0,
        }
    }
}

impl LeaderboardQuery {
    /// `limit` must be in `[1, 100]`; `offset` is unsigned already.
    pub fn validate(&self) -> Result<(), ServiceError> {
        check_limit(self.limit, MAX_LEADERBOARD_LIMIT)
    }
}

/// Query string of `GET /api/game/live`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize)]
pub struct LiveGamesQuery {
    pub mode: Option<GameMode>,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

impl LiveGamesQuery {
    /// `limit` must be in `[1, 50]`.
    pub fn validate(&self) -> Result<(), ServiceError> {
        check_limit(self.limit, MAX_LIVE_GAMES_LIMIT)
    }
}

fn check_limit(limit: u32, max: u32) -> Result<(), ServiceError> {
    if limit == 0 || limit > max {
        return Err(ServiceError::validation(format!(
            "limit must be between 1 and {max} (got {limit})"
        )));
    }
    Ok(())
}
