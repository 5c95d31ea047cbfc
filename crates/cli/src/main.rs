// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! optimist - replay optimistic action scripts

#![cfg_attr(test, allow(clippy::unwrap_used))]

mod commands;
mod merge;
mod output;
mod script;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use commands::{pending, replay};
use optimist_core::OptimistConfig;
use std::io::IsTerminal;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "optimist",
    version,
    about = "Optimist - replay optimistic updates through a JSON reducer"
)]
struct Cli {
    /// TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a script and print the final keyed state
    Replay(replay::ReplayArgs),
    /// Replay a script and list transactions still open
    Pending(pending::PendingArgs),
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => OptimistConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => OptimistConfig::default(),
    };

    match cli.command {
        Commands::Replay(args) => replay::replay(args, config),
        Commands::Pending(args) => pending::pending(args, config),
    }
}

fn init_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("optimist=warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal())
                .with_target(false),
        )
        .init();
}
