// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! optimist-core: optimistic updates for pure reducers
//!
//! This crate provides:
//! - A reducer decorator that applies actions speculatively and later
//!   commits or reverts them
//! - The transaction log and its begin/commit/revert rewrites
//! - A keyed adapter storing the log inside a JSON state object
//! - TOML configuration and `tracing` diagnostics

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod config;
pub mod effect;
pub mod envelope;
pub mod error;
pub mod id;
pub mod keyed;
pub mod log;
pub mod reducer;
pub mod state;

// Re-exports
pub use config::{ConfigError, OptimistConfig, DEFAULT_LOG_KEY};
pub use effect::{Diagnostic, LogLevel};
pub use envelope::{Action, Envelope, TransactionKind};
pub use error::OptimistError;
pub use id::TransactionId;
pub use keyed::{KeyedOptimist, StateContainer};
pub use log::{Committed, Entry, Reverted, TransactionLog};
pub use reducer::{Optimist, OptimistState, Reducer};
pub use state::Record;
