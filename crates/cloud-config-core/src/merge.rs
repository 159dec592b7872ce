// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Layer merging for input documents

use serde_json::{Map, Value as J};

/// Merge `layer` over `base`.
///
/// Objects are merged recursively, scalars and arrays replace the left value
/// and an explicit null keeps whatever the earlier layers provided.
pub fn merge_two_json(base: &mut J, layer: J) {
    match (base, layer) {
        (J::Object(a), J::Object(b)) => {
            for (k, v) in b {
                merge_two_json(a.entry(k).or_insert(J::Null), v);
            }
        }
        // arrays are replaced wholesale
        (a @ J::Array(_), J::Array(b)) => *a = J::Array(b),
        (_, J::Null) => {}
        (a, b) => *a = b,
    }
}

/// Insert a value at a dotted path, creating intermediate objects.
///
/// Any non-object found on the way is replaced by an object.
pub fn insert_dotted(root: &mut J, dotted: &str, v: J) {
    let (head, rest) = match dotted.split_once('.') {
        Some((head, rest)) => (head, Some(rest)),
        None => (dotted, None),
    };

    if !root.is_object() {
        *root = J::Object(Map::new());
    }
    let J::Object(map) = root else {
        return;
    };

    match rest {
        Some(rest) => {
            let child = map.entry(head).or_insert_with(|| J::Object(Map::new()));
            insert_dotted(child, rest, v);
        }
        None => {
            map.insert(head.to_string(), v);
        }
    }
}
