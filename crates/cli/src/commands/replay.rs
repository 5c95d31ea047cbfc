// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `optimist replay <script>` - Replay a script and print the final state

use super::ScriptArgs;
use crate::merge::merge;
use crate::output;
use crate::script::{self, ScriptEnvelope};
use anyhow::{Context, Result};
use clap::Args;
use optimist_core::{KeyedOptimist, OptimistConfig};
use serde_json::Value;

pub type MergeOptimist = KeyedOptimist<fn(&Value, &Value) -> Value, Value>;

#[derive(Args)]
pub struct ReplayArgs {
    #[command(flatten)]
    pub script: ScriptArgs,

    /// Print the state on a single line
    #[arg(long)]
    pub compact: bool,
}

pub fn replay(args: ReplayArgs, config: OptimistConfig) -> Result<()> {
    let optimist = merge_optimist(config);
    let state = run_script(&optimist, &args.script)?;
    output::print_json(&state, args.compact)
}

pub fn merge_optimist(config: OptimistConfig) -> MergeOptimist {
    KeyedOptimist::with_config(merge as fn(&Value, &Value) -> Value, config)
}

/// Load the script and initial state, then fold every envelope through the reducer
pub fn run_script(optimist: &MergeOptimist, args: &ScriptArgs) -> Result<Value> {
    let envelopes = script::load(&args.script)?;
    let initial = args
        .initial
        .as_deref()
        .map(script::load_state)
        .transpose()?;
    run(optimist, initial, envelopes)
}

pub fn run(
    optimist: &MergeOptimist,
    initial: Option<Value>,
    envelopes: Vec<ScriptEnvelope>,
) -> Result<Value> {
    if envelopes.is_empty() {
        return Ok(optimist.normalize(initial.as_ref())?);
    }

    let mut state = initial;
    for (index, envelope) in envelopes.into_iter().enumerate() {
        tracing::debug!(step = index + 1, kind = ?envelope.kind(), "replaying envelope");
        let next = optimist
            .reduce(state.as_ref(), envelope)
            .with_context(|| format!("envelope {} failed", index + 1))?;
        state = Some(next);
    }
    state.context("script produced no state")
}
