//! Player profile (the PlayerStats aggregate) as stored and as served.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a user / player (the two share one id).
pub type UserId = Uuid;

/// Player profile with statistics.
///
/// `high_score` is the best score over all modes and `games_played` the number
/// of submitted scores; both are maintained in the same transaction that
/// appends a score record. `score` is the most recently submitted score.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: UserId,
    pub username: String,
    pub score: u32,
    pub high_score: u32,
    pub games_played: u32,
}
