//! Leaderboard engine: score submission, rank computation and leaderboard pages.
//!
//! All aggregation happens in SQL over the `scores` table:
//! - a user's value on a leaderboard is `MAX(score)` over their records that
//!   match the mode filter (all modes when no filter is given);
//! - rank of a score is `1 + number of users whose per-mode max is strictly greater`.

use crate::db::{from_micros, to_micros, to_u32, to_u64};
use crate::models::{
    GameMode, LeaderboardEntry, LeaderboardPage, LiveGame, ScoreOutcome, ScoreRecord,
    ServiceError, ServiceResult, UserId,
};
use chrono::Utc;
use sqlx::{Sqlite, SqliteConnection, SqlitePool};
use uuid::Uuid;

/// Record a score for `user_id` and report whether it beat their overall best.
///
/// The stats update, the score append and the rank lookup run in one
/// transaction. The first statement is a write, so SQLite takes the write lock
/// up front and concurrent submissions for the same player serialize. If the
/// player has no stats row nothing is written and `NotFound` is returned.
pub async fn submit_score(
    pool: &SqlitePool,
    user_id: UserId,
    score: u32,
    mode: GameMode,
) -> ServiceResult<ScoreOutcome> {
    let mut tx = pool.begin().await?;
    let user_key = user_id.to_string();

    let stats: Option<(String, i64)> = sqlx::query_as(
        "UPDATE players
         SET games_played = games_played + 1, last_score = ?2
         WHERE user_id = ?1
         RETURNING username, high_score",
    )
    .bind(&user_key)
    .bind(i64::from(score))
    .fetch_optional(&mut *tx)
    .await?;

    // Dropping `tx` on this path rolls it back.
    let Some((username, previous_best)) = stats else {
        return Err(ServiceError::not_found("Player not found"));
    };

    let is_new_high_score = i64::from(score) > previous_best;
    if is_new_high_score {
        sqlx::query("UPDATE players SET high_score = ?2 WHERE user_id = ?1")
            .bind(&user_key)
            .bind(i64::from(score))
            .execute(&mut *tx)
            .await?;
    }

    let record = ScoreRecord {
        id: Uuid::new_v4(),
        user_id,
        username,
        score,
        mode,
        recorded_at: Utc::now(),
    };
    insert_score(&mut tx, &record).await?;

    let rank = rank_with(&mut *tx, score, mode).await?;
    tx.commit().await?;

    log::info!(
        "Score submitted: user={} score={} mode={} new_high={} rank={}",
        record.username,
        score,
        mode,
        is_new_high_score,
        rank
    );
    Ok(ScoreOutcome {
        is_new_high_score,
        rank,
    })
}

/// Append one score record.
pub(crate) async fn insert_score(
    conn: &mut SqliteConnection,
    record: &ScoreRecord,
) -> ServiceResult<()> {
    sqlx::query(
        "INSERT INTO scores (id, user_id, username, score, mode, recorded_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )
    .bind(record.id.to_string())
    .bind(record.user_id.to_string())
    .bind(&record.username)
    .bind(i64::from(record.score))
    .bind(record.mode.as_str())
    .bind(to_micros(record.recorded_at))
    .execute(conn)
    .await?;
    Ok(())
}

/// Rank `score` would have in `mode`: one more than the number of distinct
/// users whose best score in that mode is strictly greater. Ties share a rank.
pub async fn compute_rank(pool: &SqlitePool, score: u32, mode: GameMode) -> ServiceResult<u64> {
    rank_with(pool, score, mode).await
}

async fn rank_with<'e, E>(executor: E, score: u32, mode: GameMode) -> ServiceResult<u64>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let (higher,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*)
         FROM (
             SELECT user_id, MAX(score) AS best
             FROM scores
             WHERE mode = ?1
             GROUP BY user_id
         )
         WHERE best > ?2",
    )
    .bind(mode.as_str())
    .bind(i64::from(score))
    .fetch_one(executor)
    .await?;
    Ok(to_u64(higher) + 1)
}

#[derive(sqlx::FromRow)]
struct BestRow {
    username: String,
    max_score: i64,
    latest_at: i64,
}

/// One page of the leaderboard: each user's best score under `mode` (or
/// across all modes when `None`), highest first.
///
/// Users tied on score are ordered by who reached that score first, then by
/// user id. `rank` is the position in the full ordering, so pages are
/// disjoint and consecutive. `total` counts all ranked users, independent of
/// `limit`/`offset`. Bounds on `limit` are enforced by the caller.
pub async fn get_leaderboard(
    pool: &SqlitePool,
    mode: Option<GameMode>,
    limit: u32,
    offset: u32,
) -> ServiceResult<LeaderboardPage> {
    let mode = mode.map(GameMode::as_str);
    // One read transaction so `total` and the page come from the same snapshot.
    let mut tx = pool.begin().await?;

    let (total,): (i64,) = sqlx::query_as(
        "SELECT COUNT(DISTINCT user_id) FROM scores WHERE (?1 IS NULL OR mode = ?1)",
    )
    .bind(mode)
    .fetch_one(&mut *tx)
    .await?;

    // Usernames are fixed per account, so MAX(username) is just that name.
    let rows: Vec<BestRow> = sqlx::query_as(
        "WITH best AS (
             SELECT user_id,
                    MAX(username) AS username,
                    MAX(score) AS max_score,
                    MAX(recorded_at) AS latest_at
             FROM scores
             WHERE (?1 IS NULL OR mode = ?1)
             GROUP BY user_id
         )
         SELECT b.username,
                b.max_score,
                b.latest_at,
                (SELECT MIN(s.recorded_at)
                 FROM scores s
                 WHERE s.user_id = b.user_id
                   AND s.score = b.max_score
                   AND (?1 IS NULL OR s.mode = ?1)) AS achieved_at
         FROM best b
         ORDER BY b.max_score DESC, achieved_at ASC, b.user_id ASC
         LIMIT ?2 OFFSET ?3",
    )
    .bind(mode)
    .bind(i64::from(limit))
    .bind(i64::from(offset))
    .fetch_all(&mut *tx)
    .await?;
    tx.commit().await?;

    let entries = rows
        .into_iter()
        .enumerate()
        .map(|(position, row)| LeaderboardEntry {
            rank: u64::from(offset) + position as u64 + 1,
            username: row.username,
            score: to_u32(row.max_score),
            date: from_micros(row.latest_at),
        })
        .collect();

    Ok(LeaderboardPage {
        entries,
        total: to_u64(total),
    })
}

/// Games currently being played, filtered by `mode` and capped at `limit`.
///
/// The service keeps no in-progress game state yet, so callers pass whatever
/// snapshots they have (the HTTP layer passes none).
pub fn get_live_games(
    games: impl IntoIterator<Item = LiveGame>,
    mode: Option<GameMode>,
    limit: u32,
) -> Vec<LiveGame> {
    games
        .into_iter()
        .filter(|g| mode.map_or(true, |m| g.game_state.mode == m))
        .take(limit as usize)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Direction, GameState, Player, Position, Snake};

    fn live_game(mode: GameMode) -> LiveGame {
        LiveGame {
            id: Uuid::new_v4(),
            player: Player {
                id: Uuid::new_v4(),
                username: "Watcher".into(),
                score: 0,
                high_score: 0,
                games_played: 0,
            },
            game_state: GameState {
                snake: Snake {
                    body: vec![Position { x: 5, y: 5 }, Position { x: 4, y: 5 }],
                    direction: Direction::Right,
                },
                food: Position { x: 9, y: 2 },
                score: 30,
                is_game_over: false,
                is_paused: false,
                mode,
            },
            started_at: Utc::now(),
        }
    }

    #[test]
    fn live_games_filter_by_mode_and_cap() {
        let games = vec![
            live_game(GameMode::Walls),
            live_game(GameMode::Passthrough),
            live_game(GameMode::Walls),
            live_game(GameMode::Walls),
        ];
        assert_eq!(get_live_games(games.clone(), None, 10).len(), 4);
        assert_eq!(get_live_games(games.clone(), Some(GameMode::Walls), 10).len(), 3);
        assert_eq!(get_live_games(games.clone(), Some(GameMode::Walls), 2).len(), 2);
        let passthrough = get_live_games(games, Some(GameMode::Passthrough), 10);
        assert_eq!(passthrough.len(), 1);
        assert_eq!(passthrough[0].game_state.mode, GameMode::Passthrough);
    }

    #[test]
    fn live_game_wire_shape_is_camel_case() {
        let json = serde_json::to_value(live_game(GameMode::Walls)).unwrap();
        assert_eq!(json["gameState"]["snake"]["direction"], "RIGHT");
        assert_eq!(json["gameState"]["isGameOver"], false);
        assert_eq!(json["player"]["highScore"], 0);
        assert!(json["startedAt"].is_string());
    }
}
