//! SQLite connection pool, embedded migrations and timestamp encoding.
//!
//! Every operation in `logic` takes a `&SqlitePool` and acquires its own
//! connection (or transaction) for the duration of the call; nothing holds a
//! connection across requests.

use crate::models::ServiceResult;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Open a pool for `database_url` and bring the schema up to date.
pub async fn connect(database_url: &str, max_connections: u32) -> ServiceResult<SqlitePool> {
    let in_memory = database_url.contains(":memory:") || database_url.contains("mode=memory");
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(BUSY_TIMEOUT)
        .foreign_keys(true);

    // An in-memory database lives and dies with its single connection.
    let pool_options = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(max_connections.max(1))
    };

    let pool = pool_options.connect_with(options).await?;
    migrate(&pool).await?;
    log::debug!("Connected to {} (in_memory={})", database_url, in_memory);
    Ok(pool)
}

/// Private in-memory database, used by tests and throwaway runs.
pub async fn connect_in_memory() -> ServiceResult<SqlitePool> {
    connect("sqlite::memory:", 1).await
}

/// Apply the migrations embedded from `migrations/`.
pub async fn migrate(pool: &SqlitePool) -> ServiceResult<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Timestamps are stored as microseconds since the Unix epoch so that SQL
/// `MAX`/`MIN`/`ORDER BY` compare them numerically.
pub(crate) fn to_micros(ts: DateTime<Utc>) -> i64 {
    ts.timestamp_micros()
}

pub(crate) fn from_micros(micros: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_micros(micros).unwrap_or_default()
}

/// Clamp a non-negative database integer into `u32`.
pub(crate) fn to_u32(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

pub(crate) fn to_u64(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn micros_round_trip_keeps_precision() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap()
            + chrono::Duration::microseconds(123_456);
        assert_eq!(from_micros(to_micros(ts)), ts);
    }

    #[test]
    fn integer_clamping() {
        assert_eq!(to_u32(-5), 0);
        assert_eq!(to_u32(i64::MAX), u32::MAX);
        assert_eq!(to_u64(-1), 0);
        assert_eq!(to_u64(42), 42);
    }
}
