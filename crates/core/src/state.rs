// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Inner state shape
//!
//! Inner state must always be a keyed record. A reducer that returns a
//! scalar, null, or sequence breaks the reduction.

use crate::envelope::Action;
use crate::error::OptimistError;
use std::collections::{BTreeMap, HashMap};

/// State that may or may not be a composite key-value record
pub trait Record: Clone {
    fn is_record(&self) -> bool;
}

impl Record for serde_json::Value {
    fn is_record(&self) -> bool {
        self.is_object()
    }
}

impl Record for serde_json::Map<String, serde_json::Value> {
    fn is_record(&self) -> bool {
        true
    }
}

impl<K: Clone, V: Clone> Record for BTreeMap<K, V> {
    fn is_record(&self) -> bool {
        true
    }
}

impl<K: Clone, V: Clone, H: Clone> Record for HashMap<K, V, H> {
    fn is_record(&self) -> bool {
        true
    }
}

/// Fail with [`OptimistError::NotARecord`] naming `action` if `state` is not a record
pub fn validate<S: Record, A: Action>(state: &S, action: &A) -> Result<(), OptimistError> {
    if state.is_record() {
        Ok(())
    } else {
        Err(OptimistError::NotARecord {
            action: action.action_type().into_owned(),
        })
    }
}
