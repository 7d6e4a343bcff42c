use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};

use sahiloan_core::config::DatabaseConfig;

pub type DbPool = sqlx::SqlitePool;

/// Opens the marketplace store described by `config`. Every connection runs
/// with foreign keys on and WAL journaling, and waits out write locks for the
/// configured timeout, so the unique index on `loan_requests.to_loan_id` is
/// what resolves concurrent claims rather than a busy error.
pub async fn connect(config: &DatabaseConfig) -> Result<DbPool, sqlx::Error> {
    let timeout = Duration::from_secs(config.timeout_secs.max(1));
    let options = SqliteConnectOptions::from_str(&config.url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(timeout);

    SqlitePoolOptions::new()
        .max_connections(config.max_connections.max(1))
        .acquire_timeout(timeout)
        .connect_with(options)
        .await
}
