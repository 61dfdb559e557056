//! Threshold rules applied to a [`ServerSnapshot`]
//!
//! Every rule is evaluated on its own; a breach in one never skips the rest.

use crate::config::Thresholds;

use super::snapshot::{ReplicationLag, ReplicationStatus, ServerSnapshot};
use super::state::{CheckResult, Outcome, Status};

pub const ACTIVE_CONNECTIONS: &str = "mysql-active_connections";
pub const MAX_USED_CONNECTIONS: &str = "mysql-max_used_connections";
pub const SLAVE_IO_THREAD: &str = "mysql-slave-io_thread";
pub const SLAVE_SQL_THREAD: &str = "mysql-slave-sql_thread";
pub const SLAVE_LAST_ERRNO: &str = "mysql-slave-last_errno";
pub const SLAVE_LAG: &str = "mysql-slave-lag";

/// Evaluate all per-condition checks, in emission order
pub fn evaluate(snapshot: &ServerSnapshot, thresholds: &Thresholds) -> Vec<CheckResult> {
    let mut results = vec![
        active_connections(snapshot, thresholds),
        max_used_connections(snapshot, thresholds),
    ];

    if let Some(replication) = &snapshot.replication {
        results.extend(replication_checks(replication, thresholds));
    }

    results
}

/// Fold the per-check results and the uptime floor into one outcome
pub fn summarize(results: &[CheckResult], uptime: u64, thresholds: &Thresholds) -> Outcome {
    let restarted = uptime <= thresholds.uptime_floor;

    let mut status = results
        .iter()
        .map(|r| r.status)
        .fold(Status::Ok, Status::worst);
    if restarted {
        status = status.worst(Status::Warning);
    }

    let mut parts: Vec<String> = results
        .iter()
        .filter(|r| !r.status.is_ok())
        .map(|r| format!("{} {}", r.name, r.status))
        .collect();
    if restarted {
        parts.push(format!("MySQL server restarted {}s ago", uptime));
    }

    if parts.is_empty() {
        Outcome::new(status, "MySQL server is running")
    } else {
        Outcome::new(status, parts.join("; "))
    }
}

/// `pct` percent of `max_connections`, truncated
///
/// Widened so that any percentage accepted on the command line stays exact.
fn connection_threshold(pct: u64, max_connections: u64) -> u128 {
    u128::from(pct) * u128::from(max_connections) / 100
}

fn active_connections(snapshot: &ServerSnapshot, thresholds: &Thresholds) -> CheckResult {
    let current = snapshot.connected_threads;
    let crit = connection_threshold(thresholds.crit_conn_pct, snapshot.max_connections);
    let warn = connection_threshold(thresholds.warn_conn_pct, snapshot.max_connections);

    if u128::from(current) >= crit {
        CheckResult::critical(
            ACTIVE_CONNECTIONS,
            format!("Too many active connections - Current: {} (>= {})", current, crit),
        )
    } else if u128::from(current) >= warn {
        CheckResult::warning(
            ACTIVE_CONNECTIONS,
            format!("High number of active connections - Current: {} (>= {})", current, warn),
        )
    } else {
        CheckResult::ok(
            ACTIVE_CONNECTIONS,
            format!("{} active connections (< {})", current, warn),
        )
    }
}

/// Reaching the critical percentage is only reported as a warning: the
/// high-water mark says the limit was approached at some point, not now.
fn max_used_connections(snapshot: &ServerSnapshot, thresholds: &Thresholds) -> CheckResult {
    let max_used = snapshot.max_used_connections;
    let crit = connection_threshold(thresholds.crit_conn_pct, snapshot.max_connections);

    if u128::from(max_used) >= crit {
        CheckResult::warning(
            MAX_USED_CONNECTIONS,
            format!("MySQL server max used connections reached {} (>= {})", max_used, crit),
        )
    } else {
        CheckResult::ok(
            MAX_USED_CONNECTIONS,
            format!("MySQL server max used connections is {} (< {})", max_used, crit),
        )
    }
}

fn replication_checks(status: &ReplicationStatus, thresholds: &Thresholds) -> Vec<CheckResult> {
    let mut results = Vec::new();

    if let Some(running) = &status.io_running {
        results.push(thread_check(
            SLAVE_IO_THREAD,
            "IO",
            running,
            status.last_io_errno,
            status.last_io_error.as_deref(),
        ));
    }

    if let Some(running) = &status.sql_running {
        results.push(thread_check(
            SLAVE_SQL_THREAD,
            "SQL",
            running,
            status.last_sql_errno,
            status.last_sql_error.as_deref(),
        ));
    }

    if let Some(errno) = status.last_errno {
        results.push(if errno != 0 {
            CheckResult::critical(
                SLAVE_LAST_ERRNO,
                format!(
                    "MySQL slave replication has failed with {} error ({})",
                    errno,
                    status.last_error.as_deref().unwrap_or_default()
                ),
            )
        } else {
            CheckResult::ok(SLAVE_LAST_ERRNO, "MySQL slave replication has no errors")
        });
    }

    if let Some(lag) = status.lag {
        results.push(lag_check(lag, thresholds));
    }

    results
}

fn thread_check(
    name: &'static str,
    thread: &str,
    running: &str,
    errno: Option<u64>,
    error: Option<&str>,
) -> CheckResult {
    if running.eq_ignore_ascii_case("yes") {
        CheckResult::ok(name, format!("MySQL slave {} thread is running", thread))
    } else {
        CheckResult::critical(
            name,
            format!(
                "MySQL slave {} thread not running (Errno: {}, Error: {})",
                thread,
                errno.map(|e| e.to_string()).unwrap_or_default(),
                error.unwrap_or_default()
            ),
        )
    }
}

fn lag_check(lag: ReplicationLag, thresholds: &Thresholds) -> CheckResult {
    let seconds = match lag {
        ReplicationLag::Seconds(seconds) => seconds,
        ReplicationLag::Unknown => {
            return CheckResult::unknown(SLAVE_LAG, "MySQL slave replication lag is unknown");
        }
    };

    let msg = format!("MySQL slave replication is {}s behind master", seconds);
    if seconds >= thresholds.crit_slave_lag {
        CheckResult::critical(SLAVE_LAG, format!("{} (>= {}s)", msg, thresholds.crit_slave_lag))
    } else if seconds >= thresholds.warn_slave_lag {
        CheckResult::warning(SLAVE_LAG, format!("{} (>= {}s)", msg, thresholds.warn_slave_lag))
    } else {
        CheckResult::ok(SLAVE_LAG, "MySQL slave replication is in sync")
    }
}
