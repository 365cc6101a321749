//! ScoreRecord and the score submission request/response types.

use crate::models::mode::GameMode;
use crate::models::player::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a score record.
pub type ScoreId = Uuid;

/// One submitted score. Appended once, never mutated or deleted.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    pub id: ScoreId,
    pub user_id: UserId,
    /// Username at the time the score was written.
    pub username: String,
    pub score: u32,
    pub mode: GameMode,
    pub recorded_at: DateTime<Utc>,
}

/// Body of `POST /api/game/score`. A negative score fails to deserialize.
#[derive(Clone, Debug, Deserialize)]
pub struct ScoreSubmission {
    pub score: u32,
    pub mode: GameMode,
}

/// What the engine reports back after a submission.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ScoreOutcome {
    pub is_new_high_score: bool,
    /// Rank of the submitted score in its mode, including the submission itself.
    pub rank: u64,
}

/// Response of `POST /api/game/score`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResponse {
    pub message: String,
    pub is_new_high_score: bool,
    pub rank: u64,
}

impl From<ScoreOutcome> for ScoreResponse {
    fn from(outcome: ScoreOutcome) -> Self {
        Self {
            message: "Score submitted successfully".to_string(),
            is_new_high_score: outcome.is_new_high_score,
            rank: outcome.rank,
        }
    }
}
