use std::process::ExitCode;

use clap::Parser;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use check_mysql::client::MySqlClient;
use check_mysql::config::CliArgs;
use check_mysql::event::UdpSink;
use check_mysql::runner;

fn main() -> ExitCode {
    // Logs go to stderr, stdout carries events and the summary line
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(Level::WARN.into())
                .from_env_lossy(),
        )
        .init();

    let args = CliArgs::parse();

    let mut udp = UdpSink::default();
    let mut stdout = std::io::stdout().lock();
    let outcome = runner::run(&args, MySqlClient::connect, &mut udp, &mut stdout);

    ExitCode::from(outcome.exit_code())
}
