//! Server metrics collected during one run
//!
//! The replication record is adapted once from the raw `SHOW SLAVE STATUS`
//! row. A column that the server did not return stays `None` and the
//! matching check is skipped by the evaluator.

use std::collections::HashMap;

use tracing::debug;

use crate::client::{ClientError, StatusSource};

/// Values read from the server in a single run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSnapshot {
    /// Seconds since server start
    pub uptime: u64,
    /// `Threads_connected`
    pub connected_threads: u64,
    /// `max_connections` variable
    pub max_connections: u64,
    /// `Max_used_connections` (high-water mark since start)
    pub max_used_connections: u64,
    /// Present only when the server is configured as a replica
    pub replication: Option<ReplicationStatus>,
}

impl ServerSnapshot {
    /// Run the fixed query sequence against `source`
    pub fn collect<S: StatusSource + ?Sized>(source: &mut S) -> Result<Self, ClientError> {
        let connected_threads = source.connected_threads()?;
        let max_connections = source.max_connections_setting()?;
        let max_used_connections = source.max_used_connections()?;
        let replication = source.replication_status()?;
        let uptime = source.uptime()?;

        debug!(
            uptime,
            connected_threads,
            max_connections,
            max_used_connections,
            replica = replication.is_some(),
            "Collected server snapshot"
        );

        Ok(Self {
            uptime,
            connected_threads,
            max_connections,
            max_used_connections,
            replication,
        })
    }
}

/// Replication delay as reported by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplicationLag {
    Seconds(u64),
    /// Column present but NULL: the SQL thread is not applying events
    Unknown,
}

/// Replica state from `SHOW SLAVE STATUS` / `SHOW REPLICA STATUS`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplicationStatus {
    pub io_running: Option<String>,
    pub sql_running: Option<String>,
    pub last_io_errno: Option<u64>,
    pub last_io_error: Option<String>,
    pub last_sql_errno: Option<u64>,
    pub last_sql_error: Option<String>,
    pub last_errno: Option<u64>,
    pub last_error: Option<String>,
    pub lag: Option<ReplicationLag>,
}

impl ReplicationStatus {
    /// Build the record from `(column, value)` pairs of a status row
    ///
    /// `None` values stand for SQL NULL. Both the legacy column names and
    /// the 8.0.22+ replica names are understood.
    pub fn from_columns<I, K>(columns: I) -> Result<Self, ClientError>
    where
        I: IntoIterator<Item = (K, Option<String>)>,
        K: Into<String>,
    {
        let row: HashMap<String, Option<String>> = columns
            .into_iter()
            .map(|(name, value)| (name.into(), value))
            .collect();

        let lag = match lookup(&row, &["Seconds_Behind_Master", "Seconds_Behind_Source"]) {
            None => None,
            Some((_, None)) => Some(ReplicationLag::Unknown),
            Some((column, Some(value))) => {
                Some(ReplicationLag::Seconds(parse_number(column, value)?))
            }
        };

        Ok(Self {
            io_running: text(&row, &["Slave_IO_Running", "Replica_IO_Running"]),
            sql_running: text(&row, &["Slave_SQL_Running", "Replica_SQL_Running"]),
            last_io_errno: number(&row, "Last_IO_Errno")?,
            last_io_error: text(&row, &["Last_IO_Error"]),
            last_sql_errno: number(&row, "Last_SQL_Errno")?,
            last_sql_error: text(&row, &["Last_SQL_Error"]),
            last_errno: number(&row, "Last_Errno")?,
            last_error: text(&row, &["Last_Error"]),
            lag,
        })
    }
}

/// First of `names` present in the row, with its value.
/// `None`: no such column. Inner `None`: the column is NULL.
fn lookup<'a, 'n>(
    row: &'a HashMap<String, Option<String>>,
    names: &[&'n str],
) -> Option<(&'n str, Option<&'a str>)> {
    names
        .iter()
        .find_map(|name| row.get(*name).map(|value| (*name, value.as_deref())))
}

fn text(row: &HashMap<String, Option<String>>, names: &[&str]) -> Option<String> {
    // NULL text is treated as an empty string so the column still counts as present
    lookup(row, names).map(|(_, value)| value.unwrap_or_default().to_string())
}

fn number(row: &HashMap<String, Option<String>>, name: &str) -> Result<Option<u64>, ClientError> {
    match lookup(row, &[name]) {
        None => Ok(None),
        // NULL errno: no error recorded
        Some((_, None)) => Ok(Some(0)),
        Some((column, Some(value))) => parse_number(column, value).map(Some),
    }
}

fn parse_number(name: &str, value: &str) -> Result<u64, ClientError> {
    value.trim().parse().map_err(|_| ClientError::InvalidValue {
        field: name.to_string(),
        value: value.to_string(),
    })
}
