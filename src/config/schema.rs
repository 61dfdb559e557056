use serde::Deserialize;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 3306;
pub const DEFAULT_UPTIME_FLOOR: u64 = 300;
pub const DEFAULT_WARN_CONN_PCT: u64 = 80;
pub const DEFAULT_CRIT_CONN_PCT: u64 = 90;
pub const DEFAULT_WARN_SLAVE_LAG: u64 = 60;
pub const DEFAULT_CRIT_SLAVE_LAG: u64 = 120;

/// Fully resolved configuration for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckConfig {
    pub connection: ConnectionConfig,
    pub thresholds: Thresholds,
    /// Handler names attached to every emitted event
    pub handlers: Vec<String>,
    /// Print events instead of sending them to the client socket
    pub dry_run: bool,
}

/// Where and how to connect
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

impl ConnectionConfig {
    /// Get the address string (host:port)
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Threshold values used by the evaluator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    /// Uptime at or below this many seconds counts as a recent restart
    pub uptime_floor: u64,
    /// Percentage of `max_connections`
    pub warn_conn_pct: u64,
    /// Percentage of `max_connections`
    pub crit_conn_pct: u64,
    /// Seconds
    pub warn_slave_lag: u64,
    /// Seconds
    pub crit_slave_lag: u64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            uptime_floor: DEFAULT_UPTIME_FLOOR,
            warn_conn_pct: DEFAULT_WARN_CONN_PCT,
            crit_conn_pct: DEFAULT_CRIT_CONN_PCT,
            warn_slave_lag: DEFAULT_WARN_SLAVE_LAG,
            crit_slave_lag: DEFAULT_CRIT_SLAVE_LAG,
        }
    }
}

/// One layer of partially specified options
///
/// Deserialized from the JSON override file, and built from command-line
/// arguments. Unset fields fall through to the layer below.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConfigOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    #[serde(alias = "user")]
    pub username: Option<String>,
    pub password: Option<String>,
    pub uptime: Option<u64>,
    #[serde(alias = "warn-conn")]
    pub warn_conn: Option<u64>,
    #[serde(alias = "crit-conn")]
    pub crit_conn: Option<u64>,
    #[serde(alias = "warn-slave-lag")]
    pub warn_slave_lag: Option<u64>,
    #[serde(alias = "crit-slave-lag")]
    pub crit_slave_lag: Option<u64>,
    #[serde(deserialize_with = "deserialize_handlers")]
    pub handlers: Option<Vec<String>>,
    #[serde(alias = "dry_run")]
    pub dryrun: Option<bool>,
}

impl ConfigOverrides {
    /// Layer `upper` on top of `self`; keys set in `upper` win
    pub fn merge(self, upper: ConfigOverrides) -> ConfigOverrides {
        ConfigOverrides {
            host: upper.host.or(self.host),
            port: upper.port.or(self.port),
            username: upper.username.or(self.username),
            password: upper.password.or(self.password),
            uptime: upper.uptime.or(self.uptime),
            warn_conn: upper.warn_conn.or(self.warn_conn),
            crit_conn: upper.crit_conn.or(self.crit_conn),
            warn_slave_lag: upper.warn_slave_lag.or(self.warn_slave_lag),
            crit_slave_lag: upper.crit_slave_lag.or(self.crit_slave_lag),
            handlers: upper.handlers.or(self.handlers),
            dryrun: upper.dryrun.or(self.dryrun),
        }
    }
}

/// Handlers may be given as a JSON array or a comma separated string
fn deserialize_handlers<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Handlers {
        List(Vec<String>),
        Csv(String),
    }

    Ok(match Option::<Handlers>::deserialize(deserializer)? {
        None => None,
        Some(Handlers::List(list)) => Some(list),
        Some(Handlers::Csv(csv)) => Some(split_handlers(&csv)),
    })
}

pub(crate) fn split_handlers(csv: &str) -> Vec<String> {
    csv.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
