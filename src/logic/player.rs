//! Player profile reads.

use crate::db::to_u32;
use crate::models::{Player, ServiceError, ServiceResult, UserId};
use sqlx::SqlitePool;

/// Profile and statistics for `user_id`.
pub async fn get_profile(pool: &SqlitePool, user_id: UserId) -> ServiceResult<Player> {
    let row: Option<(String, i64, i64, i64)> = sqlx::query_as(
        "SELECT username, last_score, high_score, games_played FROM players WHERE user_id = ?1",
    )
    .bind(user_id.to_string())
    .fetch_optional(pool)
    .await?;

    let (username, score, high_score, games_played) =
        row.ok_or_else(|| ServiceError::not_found("Player profile not found"))?;
    Ok(Player {
        id: user_id,
        username,
        score: to_u32(score),
        high_score: to_u32(high_score),
        games_played: to_u32(games_played),
    })
}
