// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! `ingestd`: the telemetry ingest service binary. Parses arguments,
//! installs logging, and dispatches to a subcommand.

mod commands;
mod config;
mod env;
mod logging;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "ingestd", version, about = "Telemetry ingest service")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the ingest service until a shutdown signal arrives.
    Run {
        /// Path to the service config file.
        #[arg(long, default_value = "ingestd.toml")]
        config: PathBuf,
    },
    /// Validate the allow-list and every configured application's schema,
    /// then exit without starting the service.
    CheckConfig {
        /// Path to the service config file.
        #[arg(long, default_value = "ingestd.toml")]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _logging_guard = logging::init(env::log_dir().as_deref());

    match cli.command {
        Command::Run { config } => commands::run::run(config).await,
        Command::CheckConfig { config } => commands::check_config::check_config(config).await,
    }
}
