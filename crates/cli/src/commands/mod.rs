// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod pending;
pub mod replay;

use clap::Args;
use std::path::PathBuf;

/// Arguments shared by every command that replays a script
#[derive(Args, Debug, Clone)]
pub struct ScriptArgs {
    /// JSON-lines file of action envelopes
    pub script: PathBuf,

    /// Keyed state to start from (defaults to the initial state)
    #[arg(long)]
    pub initial: Option<PathBuf>,
}
