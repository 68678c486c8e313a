pub mod agent;
pub mod config;
pub mod metric;

pub use agent::{Agent, NewAgent};
pub use config::{
    Config, DatabaseConfig, LogFormat, LoggingConfig, PoolSettings, QueryConfig,
};
pub use metric::{Metric, MetricTypeSummary, NewMetric, RecentMetric, RECENT_METRICS_LIMIT};
