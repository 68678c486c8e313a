//! Common test utilities for integration tests

use std::path::{Path, PathBuf};
use tempfile::TempDir;

use telemetry_db::Config;

/// Create a temporary test database
///
/// Returns the path to a SQLite database file in a temporary directory.
pub fn temp_db_path() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = dir.path().join("telemetry.db");
    (dir, db_path)
}

/// Configuration pointing at a database file.
pub fn file_config(path: &Path, setup: bool) -> Config {
    let mut config = Config::default();
    config.database.url = format!("sqlite:{}", path.display());
    config.setup = setup;
    config
}

/// Setup test logging
#[allow(dead_code)]
pub fn setup_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
