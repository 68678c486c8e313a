//! Telemetry DB - persistence for IoT telemetry agents and their metrics
//!
//! Records monitored agents (hosts or processes) and the time-series metrics
//! they report, and answers queries such as "connected agents" or "latest cpu
//! readings of agent X".
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): records, errors and repository ports
//! - **Adapters** (`adapters`): `SQLite` implementations of the ports
//! - **Store** (`store`): connection, schema preparation and wiring
//! - **Infrastructure Layer** (`infrastructure`): configuration and logging
//! - **CLI Layer** (`cli`): operator command line
//!
//! # Example
//!
//! ```no_run
//! use telemetry_db::{Config, NewAgent, NewMetric, Store};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = Store::connect(&Config::default()).await?;
//!     store
//!         .agents()
//!         .create_or_update(&NewAgent::new("yyy-yyy-yyy", "probe", "root", "edge-01", 4242))
//!         .await?;
//!     store.metrics().create("yyy-yyy-yyy", &NewMetric::new("cpu", "0.42")).await?;
//!     let latest = store.metrics().find_by_type_agent_uuid("cpu", "yyy-yyy-yyy").await?;
//!     println!("{latest:?}");
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod store;

// Re-export commonly used types for convenience
pub use domain::errors::{DomainError, DomainResult};
pub use domain::models::{
    Agent, Config, DatabaseConfig, LogFormat, LoggingConfig, Metric, MetricTypeSummary, NewAgent,
    NewMetric, PoolSettings, QueryConfig, RecentMetric, RECENT_METRICS_LIMIT,
};
pub use domain::ports::{AgentFilter, AgentRepository, MetricRepository};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use store::{Store, StoreError};
