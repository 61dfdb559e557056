//! Database access for the check
//!
//! The evaluator only ever sees a [`StatusSource`]. [`MySqlClient`] is the
//! production implementation backed by a single blocking connection.

mod connection;

pub use connection::MySqlClient;

use crate::health::ReplicationStatus;

/// The five point reads the check performs
pub trait StatusSource {
    /// Seconds since the server started
    fn uptime(&mut self) -> Result<u64, ClientError>;
    /// Number of currently open connections
    fn connected_threads(&mut self) -> Result<u64, ClientError>;
    /// Configured `max_connections`
    fn max_connections_setting(&mut self) -> Result<u64, ClientError>;
    /// Highest number of simultaneous connections since start
    fn max_used_connections(&mut self) -> Result<u64, ClientError>;
    /// `None` when the server is not a replica
    fn replication_status(&mut self) -> Result<Option<ReplicationStatus>, ClientError>;
}

/// Error talking to the database
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("{0}")]
    Connect(String),
    #[error("Query '{query}' failed: {message}")]
    Query { query: String, message: String },
    #[error("Query '{0}' returned no rows")]
    MissingRow(String),
    #[error("Invalid value for {field}: '{value}'")]
    InvalidValue { field: String, value: String },
}
