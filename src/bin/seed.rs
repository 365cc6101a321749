//! Load demo players and score history into the configured database.
//! Run with: cargo run --bin seed [roster.csv]
//! Without an argument the bundled roster is used. Existing accounts are skipped.

use anyhow::Context;
use snake_showdown::config::AppConfig;
use snake_showdown::db;
use snake_showdown::logic::{load_roster, seed_players, DEFAULT_ROSTER};
use std::fs::File;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::from_env().context("failed to read configuration")?;
    let roster = match std::env::args().nth(1) {
        Some(path) => {
            let file = File::open(&path).with_context(|| format!("failed to open {path}"))?;
            load_roster(file).with_context(|| format!("failed to parse {path}"))?
        }
        None => load_roster(DEFAULT_ROSTER.as_bytes()).context("bundled roster is invalid")?,
    };

    let pool = db::connect(&config.database_url, config.db_max_connections)
        .await
        .with_context(|| format!("failed to open database {}", config.database_url))?;

    let mut rng = rand::thread_rng();
    let report = seed_players(&pool, &config.auth_settings(), &roster, &mut rng)
        .await
        .context("seeding failed")?;
    log::info!(
        "Database seeded: {} created, {} skipped",
        report.created,
        report.skipped
    );
    Ok(())
}
