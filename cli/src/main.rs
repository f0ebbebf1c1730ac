//! # ems CLI Entry Point
//!
//! Parses arguments, installs logging and dispatches to [`ems_cli::commands`].

use std::io;

use anyhow::Context;
use clap::Parser;
use ems_cli::commands::{self, Command, ShellArgs};
use ems_cli::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Browse and edit employee records.
///
/// With no subcommand an interactive shell opens on the employee list.
#[derive(Parser, Debug)]
#[command(name = "ems", version, about)]
struct Cli {
    #[command(flatten)]
    settings: Settings,

    /// Log filter, e.g. `debug` or `ems_core=trace`. Falls back to RUST_LOG.
    #[arg(long, global = true, value_name = "FILTER")]
    log: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so they never interleave with rendered screens on stdout.
    let filter = cli
        .log
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| "warn".to_string());
    tracing_subscriber::registry()
        .with(EnvFilter::try_new(filter).context("invalid log filter")?)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .try_init()
        .context("installing tracing subscriber")?;

    let api = cli.settings.api();
    let command = cli.command.unwrap_or_else(|| Command::Shell(ShellArgs::default()));
    commands::run(command, &cli.settings, &api, io::stdin().lock(), io::stdout().lock())
}
