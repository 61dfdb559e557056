//! Point reads against a live server

use check_mysql::client::{MySqlClient, StatusSource};
use check_mysql::health::ServerSnapshot;

use crate::skip_if_not_enabled;

#[test]
fn test_status_values_are_readable() {
    skip_if_not_enabled!();

    let config = crate::test_config();
    let mut client = MySqlClient::connect(&config.connection).expect("connect");

    let max_connections = client.max_connections_setting().unwrap();
    assert!(max_connections > 0);

    // This test's own connection is open
    assert!(client.connected_threads().unwrap() >= 1);
    assert!(client.max_used_connections().unwrap() >= 1);
    assert!(client.uptime().unwrap() > 0);
}

#[test]
fn test_collect_snapshot() {
    skip_if_not_enabled!();

    let config = crate::test_config();
    let mut client = MySqlClient::connect(&config.connection).expect("connect");

    let snapshot = ServerSnapshot::collect(&mut client).unwrap();
    assert!(snapshot.max_used_connections >= 1);
    if let Some(replication) = snapshot.replication {
        assert!(replication.io_running.is_some());
    }
}

#[test]
fn test_wrong_password_fails_to_connect() {
    skip_if_not_enabled!();

    let mut config = crate::test_config();
    config.connection.password = "definitely-not-the-password".to_string();

    assert!(MySqlClient::connect(&config.connection).is_err());
}
