//! Web server for the leaderboard API.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT, DATABASE_URL
//! (see `AppConfig::from_env` for the rest).

use actix_web::{middleware::Logger, web::Data, App, HttpServer};
use anyhow::Context;
use snake_showdown::config::AppConfig;
use snake_showdown::{db, logic::purge_expired_sessions, web};
use std::time::Duration;

/// How often expired sessions are swept from the database.
const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(30 * 60);

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::from_env().context("failed to read configuration")?;
    let pool = db::connect(&config.database_url, config.db_max_connections)
        .await
        .with_context(|| format!("failed to open database {}", config.database_url))?;
    let auth = Data::new(config.auth_settings());
    let pool = Data::new(pool);

    // Background task: every 30 minutes, remove sessions past their expiry
    let pool_cleanup = pool.clone();
    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(SESSION_SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            match purge_expired_sessions(&pool_cleanup).await {
                Ok(0) => {}
                Ok(removed) => log::info!("Cleaned up {} expired session(s)", removed),
                Err(e) => log::warn!("Session cleanup failed: {}", e),
            }
        }
    });

    log::info!("Starting server at http://{}", config.address());
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(pool.clone())
            .app_data(auth.clone())
            .configure(web::configure)
    })
    .bind(config.address())?
    .run()
    .await?;
    Ok(())
}
