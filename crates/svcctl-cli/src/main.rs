//! svcctl - command-line console for orchestrated services.
//!
//! A thin wrapper over `svcctl-client`: each run rehydrates the stored
//! session, refreshes an expired token when a command needs one, and
//! prints failures the way the console reports them.

mod cli;
mod commands;
mod output;
mod session;

use std::process::ExitCode;

use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands};
use session::Console;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.json_logs);

    let console = match Console::open(&cli) {
        Ok(console) => console,
        Err(err) => {
            output::error(&format!("{:#}", err));
            return ExitCode::FAILURE;
        }
    };

    let offer_login = !matches!(cli.command, Commands::Login(_));
    let Err(err) = commands::dispatch(cli.command, &console).await else {
        return ExitCode::SUCCESS;
    };

    // The interceptor has usually shown the message already.
    if !console.reported() {
        output::error(&format!("{:#}", err));
    }
    if offer_login && console.sent_to_login() {
        output::hint("Run `svcctl login` to sign in again.");
    }
    ExitCode::FAILURE
}

/// Logs go to stderr so stdout stays parseable. `RUST_LOG` wins over `-v`.
fn init_logging(verbosity: u8, json: bool) {
    let level = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let layer = fmt::layer().with_writer(std::io::stderr).with_target(false);
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(layer.json()).init();
    } else {
        registry.with(layer).init();
    }
}
