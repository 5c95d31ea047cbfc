// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Action envelopes
//!
//! Every action handed to the optimist reducer is wrapped in an [`Envelope`]
//! saying whether it opens, commits, or reverts a transaction, or is just a
//! plain action. The wrapped reducer only ever sees the inner action.

use crate::id::TransactionId;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// The three transaction markers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Begin,
    Commit,
    Revert,
}

impl TransactionKind {
    pub fn verb(&self) -> &'static str {
        match self {
            TransactionKind::Begin => "begin",
            TransactionKind::Commit => "commit",
            TransactionKind::Revert => "revert",
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.verb())
    }
}

/// An action together with its optional transaction marker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Envelope<A, T = TransactionId> {
    Plain { action: A },
    Begin { id: T, action: A },
    Commit { id: T, action: A },
    Revert { id: T, action: A },
}

impl<A, T> Envelope<A, T> {
    pub fn plain(action: A) -> Self {
        Envelope::Plain { action }
    }

    pub fn begin(id: impl Into<T>, action: A) -> Self {
        Envelope::Begin {
            id: id.into(),
            action,
        }
    }

    pub fn commit(id: impl Into<T>, action: A) -> Self {
        Envelope::Commit {
            id: id.into(),
            action,
        }
    }

    pub fn revert(id: impl Into<T>, action: A) -> Self {
        Envelope::Revert {
            id: id.into(),
            action,
        }
    }

    /// The action the wrapped reducer sees
    pub fn action(&self) -> &A {
        match self {
            Envelope::Plain { action }
            | Envelope::Begin { action, .. }
            | Envelope::Commit { action, .. }
            | Envelope::Revert { action, .. } => action,
        }
    }

    pub fn into_action(self) -> A {
        match self {
            Envelope::Plain { action }
            | Envelope::Begin { action, .. }
            | Envelope::Commit { action, .. }
            | Envelope::Revert { action, .. } => action,
        }
    }

    /// The transaction marker, `None` for plain actions
    pub fn kind(&self) -> Option<TransactionKind> {
        match self {
            Envelope::Plain { .. } => None,
            Envelope::Begin { .. } => Some(TransactionKind::Begin),
            Envelope::Commit { .. } => Some(TransactionKind::Commit),
            Envelope::Revert { .. } => Some(TransactionKind::Revert),
        }
    }

    pub fn transaction_id(&self) -> Option<&T> {
        match self {
            Envelope::Plain { .. } => None,
            Envelope::Begin { id, .. }
            | Envelope::Commit { id, .. }
            | Envelope::Revert { id, .. } => Some(id),
        }
    }
}

impl<A, T: PartialEq> Envelope<A, T> {
    /// True if this envelope carries a marker for transaction `id`,
    /// whatever its kind.
    pub fn matches(&self, id: &T) -> bool {
        self.transaction_id() == Some(id)
    }
}

/// Names an action in error messages
pub trait Action: Clone {
    fn action_type(&self) -> Cow<'_, str>;
}

impl Action for serde_json::Value {
    fn action_type(&self) -> Cow<'_, str> {
        match self.get("type").and_then(|t| t.as_str()) {
            Some(name) => Cow::Borrowed(name),
            None => Cow::Borrowed("unknown"),
        }
    }
}

impl Action for String {
    fn action_type(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}

impl Action for &'static str {
    fn action_type(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}

#[cfg(test)]
#[path = "envelope_tests.rs"]
mod tests;
