//! Process configuration from the environment (and `.env`, if present).

use crate::logic::AuthSettings;
use anyhow::{Context, Result};
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub db_max_connections: u32,
    pub token_ttl_minutes: i64,
    pub bcrypt_cost: u32,
}

impl AppConfig {
    /// Read `HOST`, `PORT`, `DATABASE_URL`, `DB_MAX_CONNECTIONS`,
    /// `TOKEN_TTL_MINUTES` and `BCRYPT_COST`, with defaults for all of them.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .context("PORT must be a valid u16")?;

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://snake_showdown.db".to_string());

        let db_max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<u32>()
            .context("DB_MAX_CONNECTIONS must be a valid u32")?;

        let token_ttl_minutes = env::var("TOKEN_TTL_MINUTES")
            .unwrap_or_else(|_| "1440".to_string())
            .parse::<i64>()
            .context("TOKEN_TTL_MINUTES must be an integer")?;
        anyhow::ensure!(token_ttl_minutes > 0, "TOKEN_TTL_MINUTES must be positive");

        let bcrypt_cost = match env::var("BCRYPT_COST") {
            Ok(v) => v.parse::<u32>().context("BCRYPT_COST must be a valid u32")?,
            Err(_) => bcrypt::DEFAULT_COST,
        };
        anyhow::ensure!(
            (4..=31).contains(&bcrypt_cost),
            "BCRYPT_COST must be between 4 and 31"
        );

        Ok(Self {
            host,
            port,
            database_url,
            db_max_connections,
            token_ttl_minutes,
            bcrypt_cost,
        })
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn auth_settings(&self) -> AuthSettings {
        AuthSettings {
            token_ttl: chrono::Duration::minutes(self.token_ttl_minutes),
            bcrypt_cost: self.bcrypt_cost,
        }
    }
}
