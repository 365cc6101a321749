//! Concurrent submissions and signups against a file-backed database.

use chrono::Duration;
use snake_showdown::{
    create_account, db, get_leaderboard, get_profile, submit_score, AuthSettings, GameMode,
    ServiceError,
};
use sqlx::SqlitePool;

const SUBMISSIONS: u32 = 24;
const SIGNUPS: usize = 64;

async fn file_pool(dir: &tempfile::TempDir, connections: u32) -> SqlitePool {
    let url = format!("sqlite://{}", dir.path().join("scores.db").display());
    db::connect(&url, connections).await.unwrap()
}

fn fast_auth() -> AuthSettings {
    AuthSettings {
        token_ttl: Duration::minutes(5),
        bcrypt_cost: 4,
    }
}

async fn count(pool: &SqlitePool, table: &str) -> i64 {
    let (n,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap();
    n
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_submissions_keep_stats_consistent_with_history() {
    let dir = tempfile::tempdir().unwrap();
    let pool = file_pool(&dir, 4).await;
    let user = create_account(&pool, &fast_auth(), "racer@example.com", "Racer", "password123")
        .await
        .unwrap();

    let user_id = user.id;
    let mut writers = Vec::new();
    for i in 0..SUBMISSIONS {
        let pool = pool.clone();
        let mode = if i % 3 == 0 { GameMode::Passthrough } else { GameMode::Walls };
        writers.push(tokio::spawn(async move {
            submit_score(&pool, user_id, i * 10, mode).await
        }));
    }

    // Readers must never see games_played out of step with the score rows.
    let reader_pool = pool.clone();
    let reader = tokio::spawn(async move {
        for _ in 0..50 {
            let (played, recorded): (i64, i64) = sqlx::query_as(
                "SELECT p.games_played,
                        (SELECT COUNT(*) FROM scores s WHERE s.user_id = p.user_id)
                 FROM players p",
            )
            .fetch_one(&reader_pool)
            .await
            .unwrap();
            assert_eq!(played, recorded);
            tokio::task::yield_now().await;
        }
    });

    let mut new_highs = 0;
    for w in writers {
        if w.await.unwrap().unwrap().is_new_high_score {
            new_highs += 1;
        }
    }
    reader.await.unwrap();
    assert!(new_highs >= 1);

    let profile = get_profile(&pool, user_id).await.unwrap();
    assert_eq!(profile.games_played, SUBMISSIONS);
    assert_eq!(profile.high_score, (SUBMISSIONS - 1) * 10);

    let overall = get_leaderboard(&pool, None, 10, 0).await.unwrap();
    assert_eq!(overall.total, 1);
    assert_eq!(overall.entries[0].score, (SUBMISSIONS - 1) * 10);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_signups_all_succeed_with_a_profile_each() {
    let dir = tempfile::tempdir().unwrap();
    let pool = file_pool(&dir, 8).await;

    let mut signups = Vec::new();
    for i in 0..SIGNUPS {
        let pool = pool.clone();
        signups.push(tokio::spawn(async move {
            create_account(
                &pool,
                &fast_auth(),
                &format!("player{i}@example.com"),
                &format!("player_{i}"),
                "password123",
            )
            .await
        }));
    }

    let mut failures = Vec::new();
    for s in signups {
        if let Err(e) = s.await.unwrap() {
            failures.push(e.to_string());
        }
    }
    assert!(failures.is_empty(), "failed signups: {failures:?}");
    assert_eq!(count(&pool, "users").await, SIGNUPS as i64);
    assert_eq!(count(&pool, "players").await, SIGNUPS as i64);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_signups_for_one_username_yield_one_account() {
    let dir = tempfile::tempdir().unwrap();
    let pool = file_pool(&dir, 8).await;

    let mut signups = Vec::new();
    for i in 0..8 {
        let pool = pool.clone();
        signups.push(tokio::spawn(async move {
            create_account(
                &pool,
                &fast_auth(),
                &format!("twin{i}@example.com"),
                "Twin",
                "password123",
            )
            .await
        }));
    }

    let mut created = 0;
    for s in signups {
        match s.await.unwrap() {
            Ok(_) => created += 1,
            Err(ServiceError::Conflict(message)) => assert_eq!(message, "Username already in use"),
            Err(e) => panic!("unexpected signup error: {e}"),
        }
    }
    assert_eq!(created, 1);
    assert_eq!(count(&pool, "users").await, 1);
    assert_eq!(count(&pool, "players").await, 1);
}
