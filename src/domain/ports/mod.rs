pub mod agent_repository;
pub mod metric_repository;

pub use agent_repository::{AgentFilter, AgentRepository};
pub use metric_repository::MetricRepository;
