// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! JSON merge reducer used by `optimist replay`
//!
//! ```json
//! {"type": "SAVE", "set": {"title": "draft"}, "unset": ["error"]}
//! {"type": "RESET", "replace": {"title": ""}}
//! ```
//!
//! Non-object state is treated as `{}`. `replace` wins over `set`/`unset`
//! and is returned verbatim, whatever its shape.

use serde_json::{Map, Value};

pub fn merge(state: &Value, action: &Value) -> Value {
    if let Some(replacement) = action.get("replace") {
        return replacement.clone();
    }

    let mut map = match state {
        Value::Object(map) => map.clone(),
        _ => Map::new(),
    };
    if let Some(Value::Object(set)) = action.get("set") {
        for (key, value) in set {
            map.insert(key.clone(), value.clone());
        }
    }
    if let Some(Value::Array(unset)) = action.get("unset") {
        for key in unset.iter().filter_map(Value::as_str) {
            map.remove(key);
        }
    }
    Value::Object(map)
}

#[cfg(test)]
#[path = "merge_tests.rs"]
mod tests;
