// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Keyed container adapter
//!
//! Stores the transaction log inside the state object itself, under a
//! reserved key, so a host that keeps one JSON object per store can use the
//! optimist reducer unchanged. The key is removed before the wrapped reducer
//! runs and put back afterwards.

use crate::config::OptimistConfig;
use crate::envelope::{Action, Envelope};
use crate::error::OptimistError;
use crate::id::TransactionId;
use crate::log::TransactionLog;
use crate::reducer::{Optimist, OptimistState, Reducer};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

/// Non-mutating key/value access to a state container
pub trait StateContainer: Sized {
    fn get(&self, key: &str) -> Option<&Value>;
    fn delete(&self, key: &str) -> Self;
    fn set(&self, key: &str, value: Value) -> Self;
}

impl StateContainer for Map<String, Value> {
    fn get(&self, key: &str) -> Option<&Value> {
        Map::get(self, key)
    }

    fn delete(&self, key: &str) -> Self {
        let mut map = self.clone();
        map.remove(key);
        map
    }

    fn set(&self, key: &str, value: Value) -> Self {
        let mut map = self.clone();
        map.insert(key.to_string(), value);
        map
    }
}

/// Optimist reducer over JSON objects carrying their own log
pub struct KeyedOptimist<R, A, T = TransactionId> {
    optimist: Optimist<R, Value, A, T>,
}

impl<R, A, T> KeyedOptimist<R, A, T>
where
    R: Reducer<Value, A>,
    A: Action + Serialize + DeserializeOwned,
    T: Clone + PartialEq + std::fmt::Display + Serialize + DeserializeOwned,
{
    pub fn new(reducer: R) -> Self {
        Self::with_config(reducer, OptimistConfig::default())
    }

    pub fn with_config(reducer: R, config: OptimistConfig) -> Self {
        Self {
            optimist: Optimist::with_config(reducer, config),
        }
    }

    pub fn log_key(&self) -> &str {
        &self.optimist.config().log_key
    }

    pub fn optimist(&self) -> &Optimist<R, Value, A, T> {
        &self.optimist
    }

    /// Reduce a keyed container; `None` is the initial state
    pub fn reduce(&self, state: Option<&Value>, envelope: Envelope<A, T>) -> Result<Value, OptimistError> {
        let separated = match state {
            Some(state) => Some(self.separate(state, &envelope)?),
            None => None,
        };
        let next = self.optimist.reduce(separated.as_ref(), envelope)?;
        self.join(next)
    }

    /// Split a container into inner state and log.
    ///
    /// A container without the reserved key has an empty log.
    pub fn separate(
        &self,
        state: &Value,
        envelope: &Envelope<A, T>,
    ) -> Result<OptimistState<Value, A, T>, OptimistError> {
        self.split(state, || envelope.action().action_type().into_owned())
    }

    /// Bring a container to the keyed shape a reduction produces; `None`
    /// gives the initial state.
    pub fn normalize(&self, state: Option<&Value>) -> Result<Value, OptimistError> {
        let separated = match state {
            Some(state) => self.split(state, || "initial state".to_string())?,
            None => OptimistState::new(Value::Object(Map::new())),
        };
        self.join(separated)
    }

    fn split(
        &self,
        state: &Value,
        action: impl FnOnce() -> String,
    ) -> Result<OptimistState<Value, A, T>, OptimistError> {
        let Value::Object(map) = state else {
            return Err(OptimistError::NotARecord { action: action() });
        };

        let log = match StateContainer::get(map, self.log_key()) {
            Some(encoded) => self.decode(encoded)?,
            None => TransactionLog::new(),
        };

        Ok(OptimistState {
            inner: Value::Object(StateContainer::delete(map, self.log_key())),
            log,
        })
    }

    fn decode(&self, encoded: &Value) -> Result<TransactionLog<Value, A, T>, OptimistError> {
        serde_json::from_value(encoded.clone()).map_err(|source| OptimistError::MalformedLog {
            key: self.log_key().to_string(),
            source,
        })
    }

    /// Put the log back under the reserved key
    pub fn join(&self, state: OptimistState<Value, A, T>) -> Result<Value, OptimistError> {
        let encoded = serde_json::to_value(&state.log).map_err(OptimistError::Encode)?;
        match state.inner {
            Value::Object(map) => Ok(Value::Object(map.set(self.log_key(), encoded))),
            // inner state is validated on every path before it gets here
            _ => Err(OptimistError::NotARecord {
                action: "unknown".to_string(),
            }),
        }
    }

    /// Ids of transactions still open in a keyed container
    pub fn open_transactions(&self, state: &Value) -> Result<Vec<T>, OptimistError> {
        let Some(encoded) = state
            .as_object()
            .and_then(|map| StateContainer::get(map, self.log_key()))
        else {
            return Ok(vec![]);
        };
        let log = self.decode(encoded)?;
        Ok(log.open_transactions().into_iter().cloned().collect())
    }
}

#[cfg(test)]
#[path = "keyed_tests.rs"]
mod tests;
