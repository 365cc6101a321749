//! Seeding demo players from the bundled roster.

use chrono::Duration;
use rand::rngs::StdRng;
use rand::SeedableRng;
use snake_showdown::logic::{load_roster, seed_players, DEFAULT_ROSTER, DEMO_PASSWORD};
use snake_showdown::{db, get_leaderboard, get_profile, verify_credentials, AuthSettings, GameMode};

fn fast_auth() -> AuthSettings {
    AuthSettings {
        token_ttl: Duration::minutes(60),
        bcrypt_cost: 4,
    }
}

#[actix_web::test]
async fn seeding_builds_consistent_history_and_is_idempotent() {
    let pool = db::connect_in_memory().await.unwrap();
    let roster = load_roster(DEFAULT_ROSTER.as_bytes()).unwrap();
    let mut rng = StdRng::seed_from_u64(42);

    let report = seed_players(&pool, &fast_auth(), &roster, &mut rng).await.unwrap();
    assert_eq!(report.created, 12);
    assert_eq!(report.skipped, 0);

    let overall = get_leaderboard(&pool, None, 100, 0).await.unwrap();
    assert_eq!(overall.total, 12);
    assert_eq!(overall.entries[0].username, "SnakeMaster");
    assert_eq!(overall.entries[0].score, 450);
    assert_eq!(overall.entries[1].username, "GridRunner");

    let passthrough = get_leaderboard(&pool, Some(GameMode::Passthrough), 100, 0)
        .await
        .unwrap();
    assert_eq!(passthrough.total, 5);
    assert_eq!(passthrough.entries[0].score, 420);

    let snake = verify_credentials(&pool, "snake@example.com", DEMO_PASSWORD).await.unwrap();
    let profile = get_profile(&pool, snake.id).await.unwrap();
    assert_eq!(profile.games_played, 89);
    assert_eq!(profile.high_score, 450);

    let (rows,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM scores WHERE user_id = ?1")
        .bind(snake.id.to_string())
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(rows, 89);

    let again = seed_players(&pool, &fast_auth(), &roster, &mut rng).await.unwrap();
    assert_eq!(again.created, 0);
    assert_eq!(again.skipped, 12);
}
