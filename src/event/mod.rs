//! Check-result events and their delivery to the local client socket

mod sink;

pub use sink::{DryRunSink, EventSink, UdpSink, DEFAULT_INTAKE_ADDR};

use serde::Serialize;

use crate::health::CheckResult;

/// Prefix identifying this check in every event output
pub const CHECK_TAG: &str = "CheckMySQL";

/// Wire form of a [`CheckResult`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    pub name: String,
    pub status: u8,
    pub output: String,
    pub handlers: Vec<String>,
}

impl Event {
    pub fn from_result(result: &CheckResult, handlers: &[String]) -> Self {
        Self {
            name: result.name.to_string(),
            status: result.status.code(),
            output: format_output(result.status.label(), &result.message),
            handlers: handlers.to_vec(),
        }
    }

    /// Single JSON line, without the trailing newline
    pub fn to_json(&self) -> String {
        // Only strings, integers and string lists: serialization cannot fail
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// `CheckMySQL <SEVERITY>: <message>`
pub fn format_output(severity: &str, message: &str) -> String {
    format!("{} {}: {}", CHECK_TAG, severity, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_from_result() {
        let result = CheckResult::critical(
            "mysql-slave-lag",
            "MySQL slave replication is 130s behind master (>= 120s)",
        );
        let event = Event::from_result(&result, &["mail".to_string()]);

        assert_eq!(event.name, "mysql-slave-lag");
        assert_eq!(event.status, 2);
        assert_eq!(
            event.output,
            "CheckMySQL CRITICAL: MySQL slave replication is 130s behind master (>= 120s)"
        );
        assert_eq!(event.handlers, vec!["mail".to_string()]);
    }

    #[test]
    fn test_event_json_shape() {
        let result = CheckResult::ok("mysql-active_connections", "3 active connections (< 80)");
        let event = Event::from_result(&result, &[]);
        let value: serde_json::Value = serde_json::from_str(&event.to_json()).unwrap();

        assert_eq!(value["name"], "mysql-active_connections");
        assert_eq!(value["status"], 0);
        assert_eq!(value["output"], "CheckMySQL OK: 3 active connections (< 80)");
        assert_eq!(value["handlers"], serde_json::json!([]));
        assert!(!event.to_json().contains('\n'));
    }
}
