// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Action scripts
//!
//! A script is JSON lines, one envelope per line:
//!
//! ```text
//! # comment
//! {"type": "begin", "id": "t1", "action": {"type": "SAVE", "set": {"title": "draft"}}}
//! {"type": "revert", "id": "t1", "action": {"type": "SAVE_FAILED"}}
//! ```

use anyhow::{Context, Result};
use optimist_core::Envelope;
use serde_json::Value;
use std::path::Path;

pub type ScriptEnvelope = Envelope<Value>;

/// Parse script text; blank lines and `#` comments are skipped
pub fn parse(content: &str) -> Result<Vec<ScriptEnvelope>> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .map(|(index, line)| {
            serde_json::from_str(line).with_context(|| format!("line {}: invalid envelope", index + 1))
        })
        .collect()
}

pub fn load(path: &Path) -> Result<Vec<ScriptEnvelope>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read script {}", path.display()))?;
    parse(&content).with_context(|| format!("in script {}", path.display()))
}

/// Read a JSON state file
pub fn load_state(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read state {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("invalid JSON in {}", path.display()))
}

#[cfg(test)]
#[path = "script_tests.rs"]
mod tests;
