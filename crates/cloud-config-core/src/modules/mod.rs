// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Per-module transforms and output shapes.
//!
//! Every transform reads only its own slice of the input and checks whether a
//! field was set before reading it. The helpers below are the emission rules
//! shared by all modules.

pub mod access;
pub mod files;
pub mod network;
pub mod packages;
pub mod system;

use crate::error::{RenderError, Result};
use cloud_config_types::{ScalarMap, Setting};
use serde_json::Value as J;
use std::collections::BTreeMap;

/// Omit when unset or empty.
pub(crate) fn non_empty(value: &Setting<String>) -> Option<String> {
    value.get().filter(|s| !s.is_empty()).cloned()
}

/// Omit unless explicitly `true`.
pub(crate) fn when_true(value: &Setting<bool>) -> Option<bool> {
    matches!(value, Setting::Set(true)).then_some(true)
}

/// Keep any explicitly supplied value.
pub(crate) fn explicit<T: Clone>(value: &Setting<T>) -> Option<T> {
    value.get().cloned()
}

/// Keep an explicit value only when it differs from the documented default.
pub(crate) fn unless_default(value: &Setting<bool>, default: bool) -> Option<bool> {
    value.get().copied().filter(|v| *v != default)
}

/// Omit when unset or equal to the zero value.
pub(crate) fn non_zero<T: Copy + Default + PartialEq>(value: &Setting<T>) -> Option<T> {
    value.get().copied().filter(|v| *v != T::default())
}

/// Omit when unset or empty.
pub(crate) fn list<T: Clone>(value: &Setting<Vec<T>>) -> Option<Vec<T>> {
    value.get().filter(|items| !items.is_empty()).cloned()
}

/// Map every record of a nested list, omitting the key when the list is unset or empty.
pub(crate) fn records<T, U>(
    value: &Setting<Vec<T>>,
    transform: impl FnMut(&T) -> Result<U>,
) -> Result<Option<Vec<U>>> {
    match value.get() {
        Some(items) if !items.is_empty() => {
            items.iter().map(transform).collect::<Result<Vec<_>>>().map(Some)
        }
        _ => Ok(None),
    }
}

/// Cast a caller supplied map into string values.
///
/// Strings pass through, numbers and booleans are stringified. Anything else
/// cannot be represented and fails the owning module.
pub(crate) fn string_map(
    module: &'static str,
    field: &str,
    value: &Setting<ScalarMap>,
) -> Result<Option<BTreeMap<String, String>>> {
    let Some(map) = value.get().filter(|map| !map.is_empty()) else {
        return Ok(None);
    };

    let mut out = BTreeMap::new();
    for (key, item) in map {
        let text = match item {
            J::String(s) => s.clone(),
            J::Number(n) => n.to_string(),
            J::Bool(b) => b.to_string(),
            other => {
                return Err(RenderError::Transform {
                    module,
                    field: format!("{field}.{key}"),
                    reason: format!("expected a scalar, found {}", kind_of(other)),
                })
            }
        };
        out.insert(key.clone(), text);
    }
    Ok(Some(out))
}

fn kind_of(value: &J) -> &'static str {
    match value {
        J::Null => "null",
        J::Bool(_) => "boolean",
        J::Number(_) => "number",
        J::String(_) => "string",
        J::Array(_) => "array",
        J::Object(_) => "object",
    }
}
