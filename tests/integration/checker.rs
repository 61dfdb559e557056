//! Full check runs against a live server

use check_mysql::client::MySqlClient;
use check_mysql::event::DryRunSink;
use check_mysql::health::{Checker, Status};

use crate::skip_if_not_enabled;

#[test]
fn test_dry_run_prints_one_event_per_check() {
    skip_if_not_enabled!();

    let checker = Checker::new(crate::test_config());
    let mut sink = DryRunSink::new(Vec::new());

    let outcome = checker.run(MySqlClient::connect, &mut sink);
    assert_ne!(outcome.status, Status::Unknown, "{}", outcome.message);

    let out = String::from_utf8(sink.into_inner()).unwrap();
    let events: Vec<serde_json::Value> = out
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert!(events.len() >= 2);
    assert_eq!(events[0]["name"], "mysql-active_connections");
    assert_eq!(events[1]["name"], "mysql-max_used_connections");
    for event in &events {
        let output = event["output"].as_str().unwrap();
        assert!(output.starts_with("CheckMySQL "));
    }
}

#[test]
fn test_unreachable_server_is_critical() {
    skip_if_not_enabled!();

    let mut config = crate::test_config();
    config.connection.host = "127.0.0.1".to_string();
    // Nothing listens on the discard port
    config.connection.port = 9;

    let checker = Checker::new(config);
    let mut sink = DryRunSink::new(Vec::new());

    let outcome = checker.run(MySqlClient::connect, &mut sink);
    assert_eq!(outcome.status, Status::Critical);
    assert!(outcome.message.starts_with("MySQL server is down ("));
    assert!(sink.into_inner().is_empty());
}
