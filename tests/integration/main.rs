//! Integration test entry point
//!
//! Run with: CHECK_MYSQL_RUN_INTEGRATION_TESTS=1 cargo test --test integration
//!
//! Environment variables:
//! - CHECK_MYSQL_RUN_INTEGRATION_TESTS: Set to "1" to enable integration tests
//! - CHECK_MYSQL_TEST_HOST: MySQL host (default: 127.0.0.1)
//! - CHECK_MYSQL_TEST_PORT: MySQL port (default: 3306)
//! - CHECK_MYSQL_TEST_USER: MySQL user (default: root)
//! - CHECK_MYSQL_TEST_PASS: MySQL password (default: test123)

mod checker;
mod client;

use std::env;

use check_mysql::config::{build, CheckConfig, ConfigOverrides};

/// Check if integration tests should run
pub fn should_run_integration_tests() -> bool {
    env::var("CHECK_MYSQL_RUN_INTEGRATION_TESTS")
        .map(|v| v == "1")
        .unwrap_or(false)
}

/// Skip test if integration tests are not enabled
#[macro_export]
macro_rules! skip_if_not_enabled {
    () => {
        if !crate::should_run_integration_tests() {
            eprintln!("Skipping integration test (set CHECK_MYSQL_RUN_INTEGRATION_TESTS=1 to run)");
            return;
        }
    };
}

/// Connection overrides for the server under test, taken from the environment
pub fn test_overrides() -> ConfigOverrides {
    ConfigOverrides {
        host: Some(env::var("CHECK_MYSQL_TEST_HOST").unwrap_or_else(|_| "127.0.0.1".to_string())),
        port: Some(
            env::var("CHECK_MYSQL_TEST_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3306),
        ),
        username: Some(env::var("CHECK_MYSQL_TEST_USER").unwrap_or_else(|_| "root".to_string())),
        password: Some(env::var("CHECK_MYSQL_TEST_PASS").unwrap_or_else(|_| "test123".to_string())),
        ..Default::default()
    }
}

/// Resolved configuration pointing at the server under test
pub fn test_config() -> CheckConfig {
    build(test_overrides()).expect("test credentials must be set")
}
