//! Demo data: accounts with score history loaded from a CSV roster.

use crate::logic::identity::{create_account, AuthSettings};
use crate::logic::leaderboard::insert_score;
use crate::models::{GameMode, ScoreRecord, ServiceError, ServiceResult, UserId};
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::Deserialize;
use sqlx::SqlitePool;
use std::io::Read;
use uuid::Uuid;

/// Password shared by every seeded account.
pub const DEMO_PASSWORD: &str = "demo123";

/// Roster bundled with the binary.
pub const DEFAULT_ROSTER: &str = include_str!("../../data/seed_players.csv");

/// One roster line: `email,username,high_score,games_played,mode`.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
pub struct SeedPlayer {
    pub email: String,
    pub username: String,
    pub high_score: u32,
    pub games_played: u32,
    pub mode: GameMode,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SeedReport {
    pub created: usize,
    /// Rows whose email or username already existed.
    pub skipped: usize,
}

/// Parse a roster with a header row.
pub fn load_roster<R: Read>(reader: R) -> Result<Vec<SeedPlayer>, csv::Error> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
        .deserialize()
        .collect()
}

/// Create every roster player that does not exist yet.
///
/// Each player gets exactly `games_played` score records (at least one): the
/// high score, dated closer to now the higher it is, plus older games at
/// 40-90% of it. Stats are set to match the inserted history.
pub async fn seed_players<R: Rng>(
    pool: &SqlitePool,
    settings: &AuthSettings,
    roster: &[SeedPlayer],
    rng: &mut R,
) -> ServiceResult<SeedReport> {
    let mut report = SeedReport::default();
    for player in roster {
        let user = match create_account(pool, settings, &player.email, &player.username, DEMO_PASSWORD)
            .await
        {
            Ok(user) => user,
            Err(ServiceError::Conflict(reason)) => {
                log::debug!("Skipping {}: {}", player.username, reason);
                report.skipped += 1;
                continue;
            }
            Err(e) => return Err(e),
        };
        let history = build_history(player, user.id, Utc::now(), rng);
        store_history(pool, user.id, &history).await?;
        report.created += 1;
    }
    log::info!(
        "Seeded {} player(s), skipped {} existing",
        report.created,
        report.skipped
    );
    Ok(report)
}

fn build_history<R: Rng>(
    player: &SeedPlayer,
    user_id: UserId,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Vec<ScoreRecord> {
    let record = |score: u32, recorded_at: DateTime<Utc>| ScoreRecord {
        id: Uuid::new_v4(),
        user_id,
        username: player.username.clone(),
        score,
        mode: player.mode,
        recorded_at,
    };
    let high_days = (7.0 * (1.0 - f64::from(player.high_score) / 500.0)).max(0.0) as i64;
    let mut history = vec![record(player.high_score, now - Duration::days(high_days))];
    for _ in 1..player.games_played.max(1) {
        let fraction: f64 = rng.gen_range(0.4..0.9);
        let score = (f64::from(player.high_score) * fraction) as u32;
        let days_ago = rng.gen_range(1..=30);
        history.push(record(score, now - Duration::days(days_ago)));
    }
    history
}

async fn store_history(pool: &SqlitePool, user_id: UserId, history: &[ScoreRecord]) -> ServiceResult<()> {
    let mut tx = pool.begin().await?;
    for record in history {
        insert_score(&mut tx, record).await?;
    }

    let high_score = history.iter().map(|r| r.score).max().unwrap_or(0);
    let last_score = history
        .iter()
        .max_by_key(|r| r.recorded_at)
        .map_or(0, |r| r.score);
    sqlx::query(
        "UPDATE players SET high_score = ?2, games_played = ?3, last_score = ?4 WHERE user_id = ?1",
    )
    .bind(user_id.to_string())
    .bind(i64::from(high_score))
    .bind(history.len() as i64)
    .bind(i64::from(last_score))
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn bundled_roster_parses() {
        let roster = load_roster(DEFAULT_ROSTER.as_bytes()).unwrap();
        assert_eq!(roster.len(), 12);
        assert_eq!(roster[0].username, "SnakeMaster");
        assert_eq!(roster[0].mode, GameMode::Walls);
        assert_eq!(roster[2].mode, GameMode::Passthrough);
    }

    #[test]
    fn history_matches_games_played_and_keeps_high_score_on_top() {
        let player = SeedPlayer {
            email: "x@example.com".into(),
            username: "Xavier".into(),
            high_score: 300,
            games_played: 6,
            mode: GameMode::Walls,
        };
        let mut rng = StdRng::seed_from_u64(7);
        let history = build_history(&player, Uuid::new_v4(), Utc::now(), &mut rng);
        assert_eq!(history.len(), 6);
        assert_eq!(history.iter().map(|r| r.score).max(), Some(300));
        assert!(history[1..].iter().all(|r| r.score < 300));
        assert!(history.iter().all(|r| r.mode == GameMode::Walls && r.username == "Xavier"));
    }

    #[test]
    fn zero_games_still_records_the_high_score() {
        let player = SeedPlayer {
            email: "z@example.com".into(),
            username: "Zed".into(),
            high_score: 10,
            games_played: 0,
            mode: GameMode::Passthrough,
        };
        let history = build_history(&player, Uuid::new_v4(), Utc::now(), &mut StdRng::seed_from_u64(1));
        assert_eq!(history.len(), 1);
    }
}
