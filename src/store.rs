//! Store entry point: connects, prepares the schema and hands out the
//! agent and metric repositories bound to one shared pool.

use std::sync::Arc;

use sqlx::SqlitePool;
use thiserror::Error;

use crate::adapters::sqlite::{
    all_embedded_migrations, create_pool, verify_connection, ConnectionError, MigrationError, Migrator,
    PoolConfig, SqliteAgentRepository, SqliteMetricRepository,
};
use crate::domain::models::Config;
use crate::domain::ports::{AgentRepository, MetricRepository};
use crate::infrastructure::config::{ConfigError, ConfigLoader};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Connection error: {0}")]
    Connection(#[from] ConnectionError),
    #[error("Migration error: {0}")]
    Migration(#[from] MigrationError),
}

/// Handle to an initialised telemetry store.
#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
    agents: Arc<dyn AgentRepository>,
    metrics: Arc<dyn MetricRepository>,
}

impl Store {
    /// Connect to the configured database and prepare its schema.
    ///
    /// With `config.setup` set every table is dropped and recreated first.
    pub async fn connect(config: &Config) -> Result<Self, StoreError> {
        ConfigLoader::validate(config)?;

        let pool = create_pool(
            &config.database.url,
            Some(PoolConfig::from_settings(&config.pool, &config.logging)),
        )
        .await?;
        verify_connection(&pool).await?;

        let migrator = Migrator::new(pool.clone());
        if config.setup {
            migrator.reset(all_embedded_migrations()).await?;
        } else {
            migrator.run_embedded_migrations(all_embedded_migrations()).await?;
        }

        tracing::info!(url = %config.database.url, setup = config.setup, "telemetry store ready");
        Ok(Self::from_pool(pool))
    }

    /// Wrap an already migrated pool.
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self {
            agents: Arc::new(SqliteAgentRepository::new(pool.clone())),
            metrics: Arc::new(SqliteMetricRepository::new(pool.clone())),
            pool,
        }
    }

    pub fn agents(&self) -> Arc<dyn AgentRepository> {
        Arc::clone(&self.agents)
    }

    pub fn metrics(&self) -> Arc<dyn MetricRepository> {
        Arc::clone(&self.metrics)
    }

    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{NewAgent, NewMetric};

    #[tokio::test]
    async fn test_connect_in_memory() {
        let store = Store::connect(&Config::in_memory()).await.unwrap();

        let agent = store
            .agents()
            .create_or_update(&NewAgent::new("yyy-yyy-yyy", "fixture", "platzi", "test-host", 0))
            .await
            .unwrap();
        store.metrics().create(&agent.uuid, &NewMetric::new("cpu", "10")).await.unwrap();

        assert_eq!(store.metrics().find().await.unwrap().len(), 1);
        store.close().await;
        assert!(store.pool().is_closed());
    }

    #[tokio::test]
    async fn test_connect_rejects_invalid_config() {
        let config = Config {
            dialect: "postgres".to_string(),
            ..Config::in_memory()
        };

        let result = Store::connect(&config).await;
        assert!(matches!(result, Err(StoreError::Config(ConfigError::UnsupportedDialect(_)))));
    }
}
