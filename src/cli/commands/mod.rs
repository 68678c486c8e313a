//! CLI command implementations.

pub mod agent;
pub mod metric;
pub mod setup;
