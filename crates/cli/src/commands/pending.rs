// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `optimist pending <script>` - List transactions still open after a replay

use super::replay::{merge_optimist, run_script};
use super::ScriptArgs;
use crate::output::{self, OutputFormat};
use anyhow::Result;
use clap::Args;
use optimist_core::OptimistConfig;

#[derive(Args)]
pub struct PendingArgs {
    #[command(flatten)]
    pub script: ScriptArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

pub fn pending(args: PendingArgs, config: OptimistConfig) -> Result<()> {
    let optimist = merge_optimist(config);
    let state = run_script(&optimist, &args.script)?;
    let open = optimist.open_transactions(&state)?;
    output::print_list(&open, args.output)
}
