use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use std::path::Path;
use thiserror::Error;

use crate::domain::models::config::Config;

/// Project configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "telemetry-db.yaml";

/// Prefix of environment variable overrides, e.g. `TELEMETRY_DB_DATABASE__URL`.
pub const ENV_PREFIX: &str = "TELEMETRY_DB_";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Unsupported dialect: {0}. Only sqlite is supported")]
    UnsupportedDialect(String),

    #[error("Database URL cannot be empty")]
    EmptyDatabaseUrl,

    #[error("Invalid database URL: {0}. Must start with sqlite:")]
    InvalidDatabaseUrl(String),

    #[error("Invalid pool max: {0}. Must be at least 1")]
    InvalidPoolMax(u32),

    #[error("Invalid pool bounds: min ({min}) exceeds max ({max})")]
    InvalidPoolBounds { min: u32, max: u32 },

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("query.raw = false is not supported: records are always returned as plain values")]
    LiveRecordsUnsupported,
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. ./telemetry-db.yaml (optional)
    /// 3. `explicit` file, when given
    /// 4. Environment variables (TELEMETRY_DB_* prefix, `__` separates nested keys)
    pub fn load(explicit: Option<&Path>) -> Result<Config> {
        let mut figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(DEFAULT_CONFIG_FILE));

        if let Some(path) = explicit {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            figment = figment.merge(Yaml::file(path));
        }

        let config: Config = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if !config.dialect.eq_ignore_ascii_case("sqlite") {
            return Err(ConfigError::UnsupportedDialect(config.dialect.clone()));
        }

        if config.database.url.is_empty() {
            return Err(ConfigError::EmptyDatabaseUrl);
        }
        if !config.database.url.starts_with("sqlite:") {
            return Err(ConfigError::InvalidDatabaseUrl(config.database.url.clone()));
        }

        if config.pool.max == 0 {
            return Err(ConfigError::InvalidPoolMax(config.pool.max));
        }
        if config.pool.min > config.pool.max {
            return Err(ConfigError::InvalidPoolBounds {
                min: config.pool.min,
                max: config.pool.max,
            });
        }

        if !config.query.raw {
            return Err(ConfigError::LiveRecordsUnsupported);
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        Ok(())
    }
}
