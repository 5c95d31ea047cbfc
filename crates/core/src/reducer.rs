// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Optimist reducer
//!
//! Wraps a pure reducer so actions can be applied speculatively and later
//! committed or reverted. The wrapped reducer is called once per applied or
//! replayed action and only ever sees the inner state.

use crate::config::OptimistConfig;
use crate::effect::{self, Diagnostic};
use crate::envelope::{Action, Envelope, TransactionKind};
use crate::error::OptimistError;
use crate::id::TransactionId;
use crate::log::TransactionLog;
use crate::state::{validate, Record};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

/// A pure, total state-transition function
pub trait Reducer<S, A> {
    fn reduce(&self, state: &S, action: &A) -> S;
}

impl<S, A, F> Reducer<S, A> for F
where
    F: Fn(&S, &A) -> S,
{
    fn reduce(&self, state: &S, action: &A) -> S {
        self(state, action)
    }
}

/// Inner state paired with its transaction log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimistState<S, A, T = TransactionId> {
    pub inner: S,
    pub log: TransactionLog<S, A, T>,
}

impl<S, A, T> OptimistState<S, A, T> {
    /// State with an empty log
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            log: TransactionLog::new(),
        }
    }
}

impl<S: Default, A, T> Default for OptimistState<S, A, T> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

/// The transaction log reducer
pub struct Optimist<R, S, A, T = TransactionId> {
    reducer: R,
    config: OptimistConfig,
    _marker: PhantomData<fn(&S, &A, &T) -> S>,
}

impl<R, S, A, T> Optimist<R, S, A, T>
where
    R: Reducer<S, A>,
    S: Record + Default,
    A: Action,
    T: Clone + PartialEq + std::fmt::Display,
{
    pub fn new(reducer: R) -> Self {
        Self::with_config(reducer, OptimistConfig::default())
    }

    pub fn with_config(reducer: R, config: OptimistConfig) -> Self {
        Self {
            reducer,
            config,
            _marker: PhantomData,
        }
    }

    pub fn config(&self) -> &OptimistConfig {
        &self.config
    }

    /// The wrapped reducer
    pub fn inner(&self) -> &R {
        &self.reducer
    }

    /// Reduce and send any diagnostics to `tracing`
    pub fn reduce(
        &self,
        state: Option<&OptimistState<S, A, T>>,
        envelope: Envelope<A, T>,
    ) -> Result<OptimistState<S, A, T>, OptimistError> {
        let (next, diagnostics) = self.transition(state, envelope)?;
        for diagnostic in &diagnostics {
            effect::emit(diagnostic, self.config.unknown_transaction);
        }
        Ok(next)
    }

    /// Pure transition - returns the new state and any diagnostics.
    ///
    /// `None` is the initial state: default inner state and an empty log.
    /// The input state is never modified.
    pub fn transition(
        &self,
        state: Option<&OptimistState<S, A, T>>,
        envelope: Envelope<A, T>,
    ) -> Result<(OptimistState<S, A, T>, Vec<Diagnostic<T>>), OptimistError> {
        let OptimistState { inner, log } = state.cloned().unwrap_or_default();

        match envelope {
            Envelope::Begin { .. } => {
                let next = self.apply(&inner, &envelope)?;
                let log = log.begin(inner, envelope);
                Ok((OptimistState { inner: next, log }, vec![]))
            }
            Envelope::Commit { ref id, .. } => {
                let committed = log.commit(id);
                let diagnostics = unknown(TransactionKind::Commit, id, committed.found);
                let next = self.record(committed.log, &inner, envelope)?;
                Ok((next, diagnostics))
            }
            Envelope::Revert { ref id, .. } => {
                let reverted = log.revert(id, &inner, &self.reducer)?;
                let diagnostics = unknown(TransactionKind::Revert, id, reverted.found);
                let next = self.record(reverted.log, &reverted.state, envelope)?;
                Ok((next, diagnostics))
            }
            Envelope::Plain { .. } => Ok((self.record(log, &inner, envelope)?, vec![])),
        }
    }

    /// Base rewrite: apply the action and log it if any transaction is open
    fn record(
        &self,
        log: TransactionLog<S, A, T>,
        inner: &S,
        envelope: Envelope<A, T>,
    ) -> Result<OptimistState<S, A, T>, OptimistError> {
        let next = self.apply(inner, &envelope)?;
        Ok(OptimistState {
            inner: next,
            log: log.record(envelope),
        })
    }

    fn apply(&self, inner: &S, envelope: &Envelope<A, T>) -> Result<S, OptimistError> {
        let next = self.reducer.reduce(inner, envelope.action());
        validate(&next, envelope.action())?;
        Ok(next)
    }
}

fn unknown<T: Clone>(kind: TransactionKind, id: &T, found: bool) -> Vec<Diagnostic<T>> {
    if found {
        vec![]
    } else {
        vec![Diagnostic::UnknownTransaction {
            kind,
            id: id.clone(),
        }]
    }
}

#[cfg(test)]
#[path = "reducer_tests.rs"]
mod tests;
