use std::path::PathBuf;

use clap::Parser;

use super::schema::ConfigOverrides;

/// Command-line options
///
/// Every option is optional here so that an unset flag does not shadow the
/// value from the config file. Defaults are applied during resolution.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "check-mysql", version)]
#[command(
    about = "Check MySQL connections, replication and uptime, reporting to the local client socket"
)]
pub struct CliArgs {
    /// MySQL host (default: localhost)
    #[arg(short = 'H', long, value_name = "HOST")]
    pub host: Option<String>,

    /// MySQL port (default: 3306)
    #[arg(short = 'p', long, value_name = "PORT")]
    pub port: Option<u16>,

    /// MySQL user
    #[arg(short = 'u', long = "user", value_name = "USER")]
    pub username: Option<String>,

    /// MySQL password
    #[arg(long, value_name = "PASSWORD")]
    pub password: Option<String>,

    /// Optional configuration file (default: <install dir>/mysql.json)
    #[arg(short = 'c', long = "config", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    /// Warn if the server has been up for at most this many seconds (default: 300)
    #[arg(long, value_name = "UPTIME")]
    pub uptime: Option<u64>,

    /// Warn when open connections reach PERCENTAGE of max connections (default: 80)
    #[arg(long, value_name = "PERCENTAGE")]
    pub warn_conn: Option<u64>,

    /// Critical when open connections reach PERCENTAGE of max connections (default: 90)
    #[arg(long, value_name = "PERCENTAGE")]
    pub crit_conn: Option<u64>,

    /// Warn when replication lag reaches SECONDS (default: 60)
    #[arg(long, value_name = "SECONDS")]
    pub warn_slave_lag: Option<u64>,

    /// Critical when replication lag reaches SECONDS (default: 120)
    #[arg(long, value_name = "SECONDS")]
    pub crit_slave_lag: Option<u64>,

    /// Comma separated list of handlers
    #[arg(long, value_name = "HANDLER", value_delimiter = ',')]
    pub handlers: Option<Vec<String>>,

    /// Do not send events to the client socket, print them instead
    #[arg(long)]
    pub dryrun: bool,
}

impl From<&CliArgs> for ConfigOverrides {
    fn from(args: &CliArgs) -> Self {
        Self {
            host: args.host.clone(),
            port: args.port,
            username: args.username.clone(),
            password: args.password.clone(),
            uptime: args.uptime,
            warn_conn: args.warn_conn,
            crit_conn: args.crit_conn,
            warn_slave_lag: args.warn_slave_lag,
            crit_slave_lag: args.crit_slave_lag,
            handlers: args.handlers.as_ref().map(|handlers| {
                handlers
                    .iter()
                    .map(|h| h.trim())
                    .filter(|h| !h.is_empty())
                    .map(str::to_string)
                    .collect()
            }),
            // A flag can only switch dry-run on
            dryrun: args.dryrun.then_some(true),
        }
    }
}
