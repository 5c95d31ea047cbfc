// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Diagnostics produced by reductions
//!
//! Reductions are pure: anything worth reporting comes back as a value and
//! the caller decides where it goes. [`emit`] sends diagnostics to `tracing`.

use crate::envelope::TransactionKind;
use serde::{Deserialize, Serialize};

/// Component name attached to every diagnostic
pub const COMPONENT: &str = "optimist";

/// A recoverable inconsistency noticed during a reduction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic<T> {
    /// COMMIT or REVERT named a transaction that is not open
    UnknownTransaction { kind: TransactionKind, id: T },
}

impl<T: std::fmt::Display> Diagnostic<T> {
    pub fn message(&self) -> String {
        match self {
            Diagnostic::UnknownTransaction { kind, id } => format!(
                "Cannot {} transaction with id \"{}\" because it does not exist",
                kind.verb(),
                id
            ),
        }
    }
}

/// Log levels for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Debug,
    Info,
    #[default]
    Warn,
    Error,
}

/// Send a diagnostic to `tracing` at `level`
pub fn emit<T: std::fmt::Display>(diagnostic: &Diagnostic<T>, level: LogLevel) {
    let Diagnostic::UnknownTransaction { kind, id } = diagnostic;
    let message = diagnostic.message();
    match level {
        LogLevel::Off => {}
        LogLevel::Debug => {
            tracing::debug!(target: "optimist", component = COMPONENT, %kind, %id, "{}", message)
        }
        LogLevel::Info => {
            tracing::info!(target: "optimist", component = COMPONENT, %kind, %id, "{}", message)
        }
        LogLevel::Warn => {
            tracing::warn!(target: "optimist", component = COMPONENT, %kind, %id, "{}", message)
        }
        LogLevel::Error => {
            tracing::error!(target: "optimist", component = COMPONENT, %kind, %id, "{}", message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::TransactionId;

    #[test]
    fn unknown_commit_message() {
        let diagnostic = Diagnostic::UnknownTransaction {
            kind: TransactionKind::Commit,
            id: TransactionId::from("t1"),
        };
        assert_eq!(
            diagnostic.message(),
            "Cannot commit transaction with id \"t1\" because it does not exist"
        );
    }

    #[test]
    fn unknown_revert_message() {
        let diagnostic = Diagnostic::UnknownTransaction {
            kind: TransactionKind::Revert,
            id: 7u32,
        };
        assert_eq!(
            diagnostic.message(),
            "Cannot revert transaction with id \"7\" because it does not exist"
        );
    }

    #[test]
    fn log_level_parses_lowercase() {
        let level: LogLevel = serde_json::from_str("\"error\"").unwrap();
        assert_eq!(level, LogLevel::Error);
        assert_eq!(LogLevel::default(), LogLevel::Warn);
    }

    #[test]
    fn emit_at_every_level_does_not_panic() {
        let diagnostic = Diagnostic::UnknownTransaction {
            kind: TransactionKind::Commit,
            id: "t1",
        };
        for level in [
            LogLevel::Off,
            LogLevel::Debug,
            LogLevel::Info,
            LogLevel::Warn,
            LogLevel::Error,
        ] {
            emit(&diagnostic, level);
        }
    }
}
