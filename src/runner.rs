//! Process-level run: resolve configuration, run the checks, print the summary

use std::io::Write;

use anyhow::Context;
use tracing::debug;

use crate::client::{ClientError, StatusSource};
use crate::config::{CliArgs, ConnectionConfig};
use crate::event::{format_output, DryRunSink, EventSink};
use crate::health::{Checker, Outcome, Status};

/// Run the whole check and write the summary line to `out`
///
/// Events go to `udp`, or to `out` as JSON lines when dry-run is enabled.
/// Configuration errors become an UNKNOWN outcome before `connect` is called.
pub fn run<S, C, U, W>(args: &CliArgs, connect: C, udp: &mut U, out: &mut W) -> Outcome
where
    S: StatusSource,
    C: FnOnce(&ConnectionConfig) -> Result<S, ClientError>,
    U: EventSink + ?Sized,
    W: Write,
{
    let outcome = match execute(args, connect, udp, out) {
        Ok(outcome) => outcome,
        Err(e) => Outcome::new(Status::Unknown, format!("{:#}", e)),
    };

    let summary = format_output(outcome.status.label(), &outcome.message);
    if let Err(e) = writeln!(out, "{}", summary) {
        debug!(error = %e, "Failed to print summary");
    }
    outcome
}

fn execute<S, C, U, W>(
    args: &CliArgs,
    connect: C,
    udp: &mut U,
    out: &mut W,
) -> anyhow::Result<Outcome>
where
    S: StatusSource,
    C: FnOnce(&ConnectionConfig) -> Result<S, ClientError>,
    U: EventSink + ?Sized,
    W: Write,
{
    let checker = Checker::from_args(args).context("Invalid configuration")?;
    let config = checker.config();

    debug!(
        addr = %config.connection.addr(),
        dry_run = config.dry_run,
        handlers = ?config.handlers,
        "Starting MySQL check"
    );

    let outcome = if config.dry_run {
        let mut sink = DryRunSink::new(&mut *out);
        checker.run(connect, &mut sink)
    } else {
        checker.run(connect, udp)
    };

    Ok(outcome)
}
