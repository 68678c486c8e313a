use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure for the telemetry store
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Storage engine identifier; only "sqlite" is supported
    #[serde(default = "default_dialect")]
    pub dialect: String,

    /// Database location
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Connection pool limits
    #[serde(default)]
    pub pool: PoolSettings,

    /// Query result mode
    #[serde(default)]
    pub query: QueryConfig,

    /// Drop and recreate all tables on connect.
    ///
    /// CAUTION: destroys existing data. Meant for fresh environments and tests.
    #[serde(default)]
    pub setup: bool,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_dialect() -> String {
    "sqlite".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dialect: default_dialect(),
            database: DatabaseConfig::default(),
            pool: PoolSettings::default(),
            query: QueryConfig::default(),
            setup: false,
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Configuration for an in-memory store with a fresh schema.
    pub fn in_memory() -> Self {
        Self {
            database: DatabaseConfig {
                url: "sqlite::memory:".to_string(),
            },
            setup: true,
            ..Self::default()
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DatabaseConfig {
    /// `SQLite` connection URL, e.g. `sqlite:telemetry.db` or `sqlite::memory:`
    #[serde(default = "default_database_url")]
    pub url: String,
}

fn default_database_url() -> String {
    "sqlite:telemetry.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
        }
    }
}

/// Connection pool limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PoolSettings {
    /// Maximum number of pooled connections
    #[serde(default = "default_pool_max")]
    pub max: u32,

    /// Minimum number of idle connections kept open
    #[serde(default)]
    pub min: u32,

    /// Idle time in milliseconds before a connection is reclaimed
    #[serde(default = "default_pool_idle_ms")]
    pub idle_ms: u64,

    /// Maximum wait in milliseconds for a free connection
    #[serde(default = "default_acquire_timeout_ms")]
    pub acquire_timeout_ms: u64,
}

const fn default_pool_max() -> u32 {
    10
}

const fn default_pool_idle_ms() -> u64 {
    10_000
}

const fn default_acquire_timeout_ms() -> u64 {
    30_000
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max: default_pool_max(),
            min: 0,
            idle_ms: default_pool_idle_ms(),
            acquire_timeout_ms: default_acquire_timeout_ms(),
        }
    }
}

/// Query result mode
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct QueryConfig {
    /// Return plain owned records
    #[serde(default = "default_true")]
    pub raw: bool,
}

const fn default_true() -> bool {
    true
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self { raw: true }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: LogFormat,

    /// Emit every executed SQL statement as a log event
    #[serde(default)]
    pub sql_statements: bool,

    /// Directory for daily-rotated log files (stdout only when unset)
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

const fn default_log_format() -> LogFormat {
    LogFormat::Pretty
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            sql_statements: false,
            log_dir: None,
        }
    }
}
