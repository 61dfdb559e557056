use mysql::prelude::Queryable;
use mysql::{Conn, OptsBuilder, Row, Value};
use tracing::{debug, error};

use crate::config::ConnectionConfig;
use crate::health::ReplicationStatus;

use super::{ClientError, StatusSource};

const UPTIME_SQL: &str = "SHOW GLOBAL STATUS LIKE 'Uptime'";
const THREADS_CONNECTED_SQL: &str = "SHOW GLOBAL STATUS LIKE 'Threads_connected'";
const MAX_CONNECTIONS_SQL: &str = "SHOW VARIABLES LIKE 'max_connections'";
const MAX_USED_CONNECTIONS_SQL: &str = "SHOW GLOBAL STATUS LIKE 'Max_used_connections'";
const SLAVE_STATUS_SQL: &str = "SHOW SLAVE STATUS";
const REPLICA_STATUS_SQL: &str = "SHOW REPLICA STATUS";

/// ER_PARSE_ERROR, returned by servers that do not know a statement
const ER_PARSE_ERROR: u16 = 1064;

/// One blocking connection to the server under check
///
/// The connection is closed when the client is dropped.
pub struct MySqlClient {
    conn: Conn,
}

impl MySqlClient {
    /// Open the connection described by `config`
    pub fn connect(config: &ConnectionConfig) -> Result<Self, ClientError> {
        debug!(addr = %config.addr(), user = %config.username, "Connecting to MySQL");

        let opts = OptsBuilder::new()
            .ip_or_hostname(Some(config.host.as_str()))
            .tcp_port(config.port)
            .user(Some(config.username.as_str()))
            .pass(Some(config.password.as_str()));

        let conn = Conn::new(opts).map_err(|e| {
            error!(addr = %config.addr(), error = %e, "Failed to connect to MySQL");
            ClientError::Connect(e.to_string())
        })?;

        Ok(Self { conn })
    }

    /// Read the `Value` column of a `SHOW STATUS`/`SHOW VARIABLES` row
    fn query_value(&mut self, sql: &str) -> Result<u64, ClientError> {
        let row: Option<(String, String)> =
            self.conn.query_first(sql).map_err(|e| query_error(sql, &e))?;

        let (name, value) = row.ok_or_else(|| ClientError::MissingRow(sql.to_string()))?;
        let parsed = value.trim().parse().map_err(|_| ClientError::InvalidValue {
            field: name.clone(),
            value: value.clone(),
        })?;

        debug!(variable = %name, value = parsed, "Read server value");
        Ok(parsed)
    }

    fn query_first_row(&mut self, sql: &str) -> Result<Option<Row>, ClientError> {
        self.conn.query_first(sql).map_err(|e| query_error(sql, &e))
    }
}

impl StatusSource for MySqlClient {
    fn uptime(&mut self) -> Result<u64, ClientError> {
        self.query_value(UPTIME_SQL)
    }

    fn connected_threads(&mut self) -> Result<u64, ClientError> {
        self.query_value(THREADS_CONNECTED_SQL)
    }

    fn max_connections_setting(&mut self) -> Result<u64, ClientError> {
        self.query_value(MAX_CONNECTIONS_SQL)
    }

    fn max_used_connections(&mut self) -> Result<u64, ClientError> {
        self.query_value(MAX_USED_CONNECTIONS_SQL)
    }

    fn replication_status(&mut self) -> Result<Option<ReplicationStatus>, ClientError> {
        let row = match self.conn.query_first::<Row, _>(SLAVE_STATUS_SQL) {
            Ok(row) => row,
            // Servers that dropped the legacy statement only accept SHOW REPLICA STATUS
            Err(e) if is_unsupported_statement(&e) => {
                debug!(error = %e, "Legacy replication status statement rejected, retrying");
                self.query_first_row(REPLICA_STATUS_SQL)?
            }
            Err(e) => return Err(query_error(SLAVE_STATUS_SQL, &e)),
        };

        match row {
            None => {
                debug!("No replication status, server is not a replica");
                Ok(None)
            }
            Some(row) => ReplicationStatus::from_columns(row_columns(&row)).map(Some),
        }
    }
}

fn query_error(sql: &str, err: &mysql::Error) -> ClientError {
    ClientError::Query {
        query: sql.to_string(),
        message: err.to_string(),
    }
}

/// Only a parse error means the statement itself is unknown; anything else
/// (missing privilege, lost connection) is reported as is
fn is_unsupported_statement(err: &mysql::Error) -> bool {
    matches!(err, mysql::Error::MySqlError(e) if e.code == ER_PARSE_ERROR)
}

/// Flatten a result row into `(column, text value)` pairs, NULL as `None`
fn row_columns(row: &Row) -> Vec<(String, Option<String>)> {
    row.columns_ref()
        .iter()
        .enumerate()
        .map(|(idx, column)| {
            let value = row.as_ref(idx).and_then(value_to_text);
            (column.name_str().into_owned(), value)
        })
        .collect()
}

fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::NULL => None,
        Value::Bytes(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
        Value::Int(v) => Some(v.to_string()),
        Value::UInt(v) => Some(v.to_string()),
        other => Some(other.as_sql(true).trim_matches('\'').to_string()),
    }
}
