// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Transaction log
//!
//! The log is an ordered list of entries, oldest first. An open entry marks
//! where a transaction began and holds the inner state from just before its
//! opening action; closed entries record every later action so it can be
//! replayed if an earlier transaction is reverted.
//!
//! ## Rewrites
//!
//! ```text
//! begin   [..]                      → [.., Open(before, BEGIN x)]
//! record  []                        → []
//!         [..]                      → [.., Closed(action)]
//! commit  [Closed*, Open(x), rest]  → rest'   (drop the committed prefix)
//!         [.., Open(y), .., Open(x), ..] → Open(x) demoted to Closed(x)
//! revert  [.., Open(x), rest]       → rest replayed from Open(x)'s snapshot,
//!                                     later open entries re-snapshotted
//! ```
//!
//! Each rewrite consumes the log and produces a new one. The scans are folds
//! over the entries with their own small scan state.

use crate::envelope::{Action, Envelope};
use crate::error::OptimistError;
use crate::id::TransactionId;
use crate::reducer::Reducer;
use crate::state::{validate, Record};
use serde::{Deserialize, Serialize};

/// One log record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Entry<S, A, T = TransactionId> {
    /// Start of a transaction, with the state from before its opening action
    Open {
        before_state: S,
        action: Envelope<A, T>,
    },
    /// An action that happened while some transaction was open
    Closed { action: Envelope<A, T> },
}

impl<S, A, T> Entry<S, A, T> {
    pub fn action(&self) -> &Envelope<A, T> {
        match self {
            Entry::Open { action, .. } | Entry::Closed { action } => action,
        }
    }

    pub fn before_state(&self) -> Option<&S> {
        match self {
            Entry::Open { before_state, .. } => Some(before_state),
            Entry::Closed { .. } => None,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Entry::Open { .. })
    }

    /// Drop the snapshot; the entry can no longer be reverted to
    pub fn close(self) -> Self {
        match self {
            Entry::Open { action, .. } | Entry::Closed { action } => Entry::Closed { action },
        }
    }
}

impl<S, A, T: PartialEq> Entry<S, A, T> {
    pub fn matches(&self, id: &T) -> bool {
        self.action().matches(id)
    }

    fn opens(&self, id: &T) -> bool {
        self.is_open() && self.matches(id)
    }
}

/// Ordered transaction log, oldest entry first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionLog<S, A, T = TransactionId> {
    entries: Vec<Entry<S, A, T>>,
}

impl<S, A, T> Default for TransactionLog<S, A, T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<S, A, T> From<Vec<Entry<S, A, T>>> for TransactionLog<S, A, T> {
    fn from(entries: Vec<Entry<S, A, T>>) -> Self {
        Self { entries }
    }
}

impl<S, A, T> TransactionLog<S, A, T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[Entry<S, A, T>] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entry<S, A, T>> {
        self.entries.iter()
    }

    pub fn into_entries(self) -> Vec<Entry<S, A, T>> {
        self.entries
    }

    /// Ids of transactions that are still open, oldest first
    pub fn open_transactions(&self) -> Vec<&T> {
        self.entries
            .iter()
            .filter(|entry| entry.is_open())
            .filter_map(|entry| entry.action().transaction_id())
            .collect()
    }

    /// Append an open entry for a transaction starting at `before_state`
    pub fn begin(mut self, before_state: S, action: Envelope<A, T>) -> Self {
        self.entries.push(Entry::Open {
            before_state,
            action,
        });
        self
    }

    /// Record an action that was applied outside any rewrite.
    ///
    /// An empty log stays empty: with no open transaction there is nothing
    /// the action would ever need to be replayed for.
    pub fn record(mut self, action: Envelope<A, T>) -> Self {
        if !self.entries.is_empty() {
            self.entries.push(Entry::Closed { action });
        }
        self
    }
}

impl<S, A, T: PartialEq> TransactionLog<S, A, T> {
    pub fn is_open(&self, id: &T) -> bool {
        self.entries.iter().any(|entry| entry.opens(id))
    }

    /// Make transaction `id` permanent.
    ///
    /// Entries ahead of the first open entry of another transaction are
    /// dropped, the target's own open entry included. Past that boundary the
    /// target's open entry is demoted to a closed one and everything else is
    /// kept verbatim.
    pub fn commit(self, id: &T) -> Committed<S, A, T> {
        let scan = self
            .entries
            .into_iter()
            .fold(CommitScan::new(), |scan, entry| scan.step(entry, id));

        Committed {
            log: TransactionLog { entries: scan.kept },
            found: scan.committed,
        }
    }
}

impl<S, A, T> TransactionLog<S, A, T>
where
    S: Record,
    A: Action,
    T: PartialEq,
{
    /// Undo transaction `id`.
    ///
    /// State is rebuilt from the target's snapshot by replaying every later
    /// entry not tagged with `id`; open entries after the target get their
    /// snapshots recomputed on the corrected timeline. When `id` is not open
    /// the log is still rebuilt but `live` is returned unchanged.
    pub fn revert<R>(self, id: &T, live: &S, reducer: &R) -> Result<Reverted<S, A, T>, OptimistError>
    where
        R: Reducer<S, A> + ?Sized,
    {
        let scan = self
            .entries
            .into_iter()
            .try_fold(RevertScan::new(), |scan, entry| scan.step(entry, id, reducer))?;

        let (state, found) = match scan.reconstruction {
            Reconstruction::Found(state) => (state, true),
            Reconstruction::Pending => (live.clone(), false),
        };

        Ok(Reverted {
            log: TransactionLog { entries: scan.kept },
            state,
            found,
        })
    }
}

impl<'a, S, A, T> IntoIterator for &'a TransactionLog<S, A, T> {
    type Item = &'a Entry<S, A, T>;
    type IntoIter = std::slice::Iter<'a, Entry<S, A, T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Result of [`TransactionLog::commit`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Committed<S, A, T = TransactionId> {
    pub log: TransactionLog<S, A, T>,
    /// Whether an open entry for the id was found
    pub found: bool,
}

/// Result of [`TransactionLog::revert`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reverted<S, A, T = TransactionId> {
    pub log: TransactionLog<S, A, T>,
    /// Inner state rebuilt without the reverted transaction
    pub state: S,
    /// Whether an open entry for the id was found
    pub found: bool,
}

/// Where a commit scan is relative to the first other open transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Boundary {
    Leading,
    Nested,
}

struct CommitScan<S, A, T> {
    boundary: Boundary,
    committed: bool,
    kept: Vec<Entry<S, A, T>>,
}

impl<S, A, T: PartialEq> CommitScan<S, A, T> {
    fn new() -> Self {
        Self {
            boundary: Boundary::Leading,
            committed: false,
            kept: Vec::new(),
        }
    }

    fn step(mut self, entry: Entry<S, A, T>, id: &T) -> Self {
        let target = entry.opens(id);
        match self.boundary {
            Boundary::Leading if target => self.committed = true,
            Boundary::Leading if entry.is_open() => {
                self.boundary = Boundary::Nested;
                self.kept.push(entry);
            }
            // nothing can roll back past this point any more
            Boundary::Leading => {}
            Boundary::Nested if target => {
                self.committed = true;
                self.kept.push(entry.close());
            }
            Boundary::Nested => self.kept.push(entry),
        }
        self
    }
}

/// Replay state of a revert scan
enum Reconstruction<S> {
    /// Target not reached yet
    Pending,
    /// Rebuilt state so far, starting from the target's snapshot
    Found(S),
}

struct RevertScan<S, A, T> {
    started: bool,
    reconstruction: Reconstruction<S>,
    kept: Vec<Entry<S, A, T>>,
}

impl<S, A, T> RevertScan<S, A, T>
where
    S: Record,
    A: Action,
    T: PartialEq,
{
    fn new() -> Self {
        Self {
            started: false,
            reconstruction: Reconstruction::Pending,
            kept: Vec::new(),
        }
    }

    fn step<R>(mut self, entry: Entry<S, A, T>, id: &T, reducer: &R) -> Result<Self, OptimistError>
    where
        R: Reducer<S, A> + ?Sized,
    {
        if entry.matches(id) {
            if let Entry::Open { before_state, .. } = entry {
                self.reconstruction = Reconstruction::Found(before_state);
            }
            return Ok(self);
        }

        if entry.is_open() {
            self.started = true;
        }

        let replayed = match &self.reconstruction {
            Reconstruction::Found(current) => {
                let action = entry.action().action();
                let next = reducer.reduce(current, action);
                validate(&next, action)?;
                Some(next)
            }
            Reconstruction::Pending => None,
        };

        if self.started {
            let kept = match (&self.reconstruction, entry) {
                (Reconstruction::Found(current), Entry::Open { action, .. }) => Entry::Open {
                    before_state: current.clone(),
                    action,
                },
                (_, entry) => entry,
            };
            self.kept.push(kept);
        }

        if let Some(next) = replayed {
            self.reconstruction = Reconstruction::Found(next);
        }
        Ok(self)
    }
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
