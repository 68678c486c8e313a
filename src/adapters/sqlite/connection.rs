//! SQLite database connection pool management.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{ConnectOptions, SqlitePool};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::domain::models::{LoggingConfig, PoolSettings};

/// Level of the `sqlx::query` events emitted when statement logging is on.
pub const STATEMENT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;

#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("Failed to create pool: {0}")]
    PoolCreationFailed(#[source] sqlx::Error),
    #[error("Invalid database URL: {0}")]
    InvalidDatabaseUrl(String),
    #[error("Failed to create directory: {0}")]
    DirectoryCreationFailed(#[source] std::io::Error),
    #[error("Connection failed: {0}")]
    ConnectionFailed(#[source] sqlx::Error),
}

#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub idle_timeout: Option<Duration>,
    pub acquire_timeout: Duration,
    pub log_statements: bool,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::from_settings(&PoolSettings::default(), &LoggingConfig::default())
    }
}

impl PoolConfig {
    pub const fn from_settings(pool: &PoolSettings, logging: &LoggingConfig) -> Self {
        Self {
            max_connections: pool.max,
            min_connections: pool.min,
            idle_timeout: Some(Duration::from_millis(pool.idle_ms)),
            acquire_timeout: Duration::from_millis(pool.acquire_timeout_ms),
            log_statements: logging.sql_statements,
        }
    }
}

/// Whether the URL names a private in-memory database.
pub fn is_memory_url(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

pub async fn create_pool(database_url: &str, config: Option<PoolConfig>) -> Result<SqlitePool, ConnectionError> {
    let mut config = config.unwrap_or_default();
    if !database_url.starts_with("sqlite:") {
        return Err(ConnectionError::InvalidDatabaseUrl(database_url.to_string()));
    }
    ensure_database_directory(database_url)?;

    let mut connect_options = SqliteConnectOptions::from_str(database_url)
        .map_err(|_| ConnectionError::InvalidDatabaseUrl(database_url.to_string()))?
        .create_if_missing(true)
        .synchronous(SqliteSynchronous::Normal)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(30));

    // Every connection to ":memory:" opens its own database, so the pool must
    // hold exactly one connection and never reap it.
    if is_memory_url(database_url) {
        config.max_connections = 1;
        config.min_connections = 1;
        config.idle_timeout = None;
    } else {
        connect_options = connect_options.journal_mode(SqliteJournalMode::Wal);
    }

    // sqlx logs statements at DEBUG by default, below the usual "info" filter.
    connect_options = if config.log_statements {
        connect_options.log_statements(STATEMENT_LOG_LEVEL)
    } else {
        connect_options.disable_statement_logging()
    };

    let mut pool_options = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .idle_timeout(config.idle_timeout)
        .acquire_timeout(config.acquire_timeout);

    if is_memory_url(database_url) {
        pool_options = pool_options.max_lifetime(None::<Duration>);
    }

    let pool = pool_options
        .connect_with(connect_options)
        .await
        .map_err(ConnectionError::PoolCreationFailed)?;

    tracing::debug!(
        url = %database_url,
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        "sqlite pool created"
    );

    Ok(pool)
}

pub async fn create_test_pool() -> Result<SqlitePool, ConnectionError> {
    create_pool("sqlite::memory:", None).await
}

fn ensure_database_directory(database_url: &str) -> Result<(), ConnectionError> {
    let path = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))
        .unwrap_or(database_url);
    let path = path.split('?').next().unwrap_or(path);

    if is_memory_url(database_url) || path.is_empty() {
        return Ok(());
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).map_err(ConnectionError::DirectoryCreationFailed)?;
        }
    }
    Ok(())
}

pub async fn verify_connection(pool: &SqlitePool) -> Result<(), ConnectionError> {
    sqlx::query("SELECT 1").fetch_one(pool).await.map_err(ConnectionError::ConnectionFailed)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_url_detection() {
        assert!(is_memory_url("sqlite::memory:"));
        assert!(is_memory_url("sqlite:file:test?mode=memory&cache=shared"));
        assert!(!is_memory_url("sqlite:telemetry.db"));
    }

    #[tokio::test]
    async fn test_foreign_keys_enabled() {
        let pool = create_test_pool().await.unwrap();
        let (enabled,): (i64,) = sqlx::query_as("PRAGMA foreign_keys")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(enabled, 1);
    }

    #[tokio::test]
    async fn test_file_pool_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("nested").join("telemetry.db");
        let url = format!("sqlite:{}", db_path.display());

        let pool = create_pool(&url, None).await.unwrap();
        verify_connection(&pool).await.unwrap();

        assert!(db_path.exists());
        pool.close().await;
    }

    #[tokio::test]
    async fn test_invalid_url_is_rejected() {
        let result = create_pool("postgres://localhost/telemetry", None).await;
        assert!(matches!(result, Err(ConnectionError::InvalidDatabaseUrl(_))));
    }
}
