// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Mutually exclusive input fields, checked once before any module runs.
//!
//! A field counts as set when it is present and not null. Scopes are dotted
//! paths from the root; a `*` segment visits every element of a list.

use crate::error::{RenderError, Result};
use serde_json::Value as J;

/// At most one of `fields` may be set inside each object selected by `scope`.
#[derive(Debug, Clone, Copy)]
pub struct Exclusion {
    pub scope: &'static str,
    pub fields: &'static [&'static str],
}

pub const EXCLUSIONS: &[Exclusion] = &[
    Exclusion {
        scope: "",
        fields: &["manage_etc_hosts", "manage_etc_hosts_localhost"],
    },
    Exclusion {
        scope: "apt_pipelining",
        fields: &["os", "disable", "depth"],
    },
    Exclusion {
        scope: "power_state",
        fields: &["delay", "no_delay"],
    },
    Exclusion {
        scope: "power_state",
        fields: &["condition", "condition_cmd"],
    },
    Exclusion {
        scope: "user",
        fields: &["ssh_redirect_user", "ssh_authorized_keys"],
    },
    Exclusion {
        scope: "user",
        fields: &["ssh_redirect_user", "ssh_import_id"],
    },
    Exclusion {
        scope: "users.*",
        fields: &["ssh_redirect_user", "ssh_authorized_keys"],
    },
    Exclusion {
        scope: "users.*",
        fields: &["ssh_redirect_user", "ssh_import_id"],
    },
];

/// Fail on the first exclusion violated by `input`.
pub fn check(input: &J) -> Result<()> {
    for exclusion in EXCLUSIONS {
        for (path, object) in select(input, exclusion.scope) {
            let set: Vec<String> = exclusion
                .fields
                .iter()
                .filter(|field| object.get(**field).is_some_and(|v| !v.is_null()))
                .map(|field| field.to_string())
                .collect();

            if set.len() > 1 {
                return Err(RenderError::Conflict {
                    scope: path,
                    fields: set,
                });
            }
        }
    }
    Ok(())
}

fn select<'a>(root: &'a J, scope: &str) -> Vec<(String, &'a J)> {
    let mut current = vec![("(root)".to_string(), root)];
    for segment in scope.split('.').filter(|s| !s.is_empty()) {
        let mut next = Vec::new();
        for (path, value) in current {
            match (segment, value) {
                ("*", J::Array(items)) => {
                    for (i, item) in items.iter().enumerate() {
                        next.push((format!("{path}[{i}]"), item));
                    }
                }
                ("*", J::Object(_)) => next.push((path, value)),
                (name, J::Object(map)) => {
                    if let Some(child) = map.get(name).filter(|v| !v.is_null()) {
                        let path = if path == "(root)" {
                            name.to_string()
                        } else {
                            format!("{path}.{name}")
                        };
                        next.push((path, child));
                    }
                }
                _ => {}
            }
        }
        current = next;
    }
    current
        .into_iter()
        .filter(|(_, value)| value.is_object())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn conflict(input: J) -> (String, Vec<String>) {
        match check(&input) {
            Err(RenderError::Conflict { scope, fields }) => (scope, fields),
            other => panic!("expected a conflict, got {other:?}"),
        }
    }

    #[test]
    fn test_root_conflict() {
        let (scope, fields) = conflict(json!({
            "manage_etc_hosts": true,
            "manage_etc_hosts_localhost": true,
        }));
        assert_eq!(scope, "(root)");
        assert_eq!(fields, ["manage_etc_hosts", "manage_etc_hosts_localhost"]);
    }

    #[test]
    fn test_null_does_not_count_as_set() {
        check(&json!({
            "manage_etc_hosts": null,
            "manage_etc_hosts_localhost": true,
            "apt_pipelining": {"os": true, "disable": null, "depth": null},
        }))
        .unwrap();
    }

    #[test]
    fn test_false_counts_as_set() {
        let (scope, fields) = conflict(json!({"apt_pipelining": {"os": false, "depth": 4}}));
        assert_eq!(scope, "apt_pipelining");
        assert_eq!(fields, ["os", "depth"]);
    }

    #[test]
    fn test_list_scope_reports_element() {
        let (scope, fields) = conflict(json!({
            "users": [
                {"name": "a", "ssh_authorized_keys": ["k"]},
                {"name": "b", "ssh_redirect_user": true, "ssh_import_id": ["gh:b"]},
            ]
        }));
        assert_eq!(scope, "users[1]");
        assert_eq!(fields, ["ssh_redirect_user", "ssh_import_id"]);
    }

    #[test]
    fn test_power_state_pairs() {
        let (scope, _) = conflict(json!({"power_state": {"condition": true, "condition_cmd": "x"}}));
        assert_eq!(scope, "power_state");

        check(&json!({"power_state": {"delay": 5, "condition_cmd": "x"}})).unwrap();
    }

    #[test]
    fn test_missing_scopes_are_skipped() {
        check(&json!({})).unwrap();
        check(&json!({"users": null, "user": null})).unwrap();
    }
}
