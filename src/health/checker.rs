//! One check run: connect, collect, evaluate, emit, summarize

use tracing::{info, warn};

use crate::client::{ClientError, StatusSource};
use crate::config::{self, CheckConfig, CliArgs, ConfigError, ConnectionConfig};
use crate::event::{Event, EventSink};

use super::evaluator::{evaluate, summarize};
use super::snapshot::ServerSnapshot;
use super::state::{Outcome, Status};

/// Runs the MySQL checks for a resolved configuration
pub struct Checker {
    config: CheckConfig,
}

impl Checker {
    pub fn new(config: CheckConfig) -> Self {
        Self { config }
    }

    /// Resolve configuration from the command line (and config file)
    ///
    /// Fails before anything touches the network when credentials are missing.
    pub fn from_args(args: &CliArgs) -> Result<Self, ConfigError> {
        config::resolve(args).map(Self::new)
    }

    pub fn config(&self) -> &CheckConfig {
        &self.config
    }

    /// Execute the run and return the overall outcome
    ///
    /// `connect` is called exactly once. If it fails, the run ends with a
    /// critical outcome and no events are emitted. Query failures end the run
    /// as unknown, also without events.
    pub fn run<S, C, E>(&self, connect: C, sink: &mut E) -> Outcome
    where
        S: StatusSource,
        C: FnOnce(&ConnectionConfig) -> Result<S, ClientError>,
        E: EventSink + ?Sized,
    {
        let mut source = match connect(&self.config.connection) {
            Ok(source) => source,
            Err(e) => {
                warn!(addr = %self.config.connection.addr(), error = %e, "MySQL server is down");
                return Outcome::new(Status::Critical, format!("MySQL server is down ({})", e));
            }
        };

        let snapshot = match ServerSnapshot::collect(&mut source) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, "Failed to read server status");
                return Outcome::new(Status::Unknown, e.to_string());
            }
        };

        let results = evaluate(&snapshot, &self.config.thresholds);
        for result in &results {
            if !result.status.is_ok() {
                info!(
                    check = result.name,
                    status = %result.status,
                    message = %result.message,
                    "Check not OK"
                );
            }
            sink.send(&Event::from_result(result, &self.config.handlers));
        }

        summarize(&results, snapshot.uptime, &self.config.thresholds)
    }
}
