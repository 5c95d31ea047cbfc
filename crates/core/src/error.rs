// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors raised while reducing

use thiserror::Error;

/// Fatal reduction failures.
///
/// Commit or revert of an unknown transaction is not an error; it is reported
/// as a [`Diagnostic`](crate::effect::Diagnostic) instead.
#[derive(Debug, Error)]
pub enum OptimistError {
    #[error(
        "error while handling \"{action}\": optimist requires that state is always a keyed record"
    )]
    NotARecord { action: String },
    #[error("transaction log under \"{key}\" is malformed: {source}")]
    MalformedLog {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode transaction log: {0}")]
    Encode(#[source] serde_json::Error),
}
