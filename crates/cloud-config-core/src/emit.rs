// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Block-style YAML writer with a four column indentation step.
//!
//! Layout follows the go-yaml v3 emitter configured with `SetIndent(4)`:
//! a block nested under a mapping key moves to the next multiple of four,
//! while the content of a sequence item sits two columns past its `- `.
//! Quoting of individual scalars is left to `serde_yaml`, except for strings
//! that a YAML 1.1 loader would resolve to another type.

use crate::error::{RenderError, Result};
use regex::Regex;
use serde_yaml::{Mapping, Value};
use std::sync::OnceLock;

const STEP: usize = 4;

/// Plain scalars that YAML 1.1 resolves to something other than a string.
const YAML11_IMPLICIT: &[&str] = &[
    // bool
    r"y|Y|yes|Yes|YES|n|N|no|No|NO|true|True|TRUE|false|False|FALSE|on|On|ON|off|Off|OFF",
    // null
    r"~|null|Null|NULL",
    // int, including base 60
    r"[-+]?0b[0-1_]+",
    r"[-+]?0[0-7_]+",
    r"[-+]?(?:0|[1-9][0-9_]*)",
    r"[-+]?0x[0-9a-fA-F_]+",
    r"[-+]?[1-9][0-9_]*(?::[0-5]?[0-9])+",
    // float, including base 60
    r"[-+]?[0-9][0-9_]*\.[0-9_]*(?:[eE][-+][0-9]+)?",
    r"\.[0-9_]+(?:[eE][-+][0-9]+)?",
    r"[-+]?[0-9][0-9_]*(?::[0-5]?[0-9])+\.[0-9_]*",
    r"[-+]?\.(?:inf|Inf|INF)",
    r"\.(?:nan|NaN|NAN)",
    // timestamp
    r"[0-9]{4}-[0-9]{1,2}-[0-9]{1,2}(?:(?:[Tt]|[ \t]+)[0-9]{1,2}:[0-9]{2}:[0-9]{2}(?:\.[0-9]*)?(?:[ \t]*(?:Z|[-+][0-9]{1,2}(?::[0-9]{2})?))?)?",
    // merge and value keys
    r"<<|=",
];

fn is_yaml11_implicit(text: &str) -> Result<bool> {
    static PATTERN: OnceLock<std::result::Result<Regex, String>> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| {
        let alternatives: Vec<String> = YAML11_IMPLICIT
            .iter()
            .map(|alternative| format!("(?:{alternative})"))
            .collect();
        Regex::new(&format!("^(?:{})$", alternatives.join("|"))).map_err(|e| e.to_string())
    });

    match pattern {
        Ok(pattern) => Ok(pattern.is_match(text)),
        Err(e) => Err(RenderError::Emit(format!("invalid scalar resolver: {e}"))),
    }
}

/// Encode one scalar, single-quoting strings that would not load back as strings.
fn scalar_text(value: &Value) -> Result<String> {
    if let Value::String(text) = value {
        if is_yaml11_implicit(text)? {
            return Ok(format!("'{text}'"));
        }
    }
    Ok(serde_yaml::to_string(value)?)
}

fn nested(indent: usize) -> usize {
    STEP * ((indent + STEP) / STEP)
}

/// Write a mapping tree as a block document body.
pub fn emit(root: &Value) -> Result<String> {
    let Value::Mapping(map) = root else {
        return Err(RenderError::Emit(
            "document root must be a mapping".to_string(),
        ));
    };

    let mut emitter = Emitter::default();
    emitter.mapping(map, 0, false)?;
    Ok(emitter.out)
}

#[derive(Default)]
struct Emitter {
    out: String,
}

impl Emitter {
    fn pad(&mut self, indent: usize) {
        self.out.extend(std::iter::repeat(' ').take(indent));
    }

    /// `inline` continues the line opened by a sequence indicator.
    fn mapping(&mut self, map: &Mapping, indent: usize, mut inline: bool) -> Result<()> {
        for (key, value) in map {
            if !inline {
                self.pad(indent);
            }
            inline = false;

            self.out.push_str(&key_text(key)?);
            self.out.push(':');

            let child = nested(indent);
            match value {
                Value::Mapping(inner) if !inner.is_empty() => {
                    self.out.push('\n');
                    self.mapping(inner, child, false)?;
                }
                Value::Sequence(items) if !items.is_empty() => {
                    self.out.push('\n');
                    self.sequence(items, child, false)?;
                }
                other => {
                    self.out.push(' ');
                    self.scalar(other, indent, child)?;
                }
            }
        }
        Ok(())
    }

    fn sequence(&mut self, items: &[Value], indent: usize, mut inline: bool) -> Result<()> {
        let child = indent + 2;
        for item in items {
            if !inline {
                self.pad(indent);
            }
            inline = false;

            self.out.push_str("- ");
            match item {
                Value::Mapping(inner) if !inner.is_empty() => self.mapping(inner, child, true)?,
                Value::Sequence(inner) if !inner.is_empty() => self.sequence(inner, child, true)?,
                other => self.scalar(other, indent, child)?,
            }
        }
        Ok(())
    }

    /// Write a scalar (or empty collection) followed by a line break.
    ///
    /// Continuation lines move to `child`; a block scalar header keeps its
    /// style and chomping but gets an indentation indicator relative to `parent`.
    fn scalar(&mut self, value: &Value, parent: usize, child: usize) -> Result<()> {
        let rendered = match value {
            Value::Sequence(_) => "[]".to_string(),
            Value::Mapping(_) => "{}".to_string(),
            other => scalar_text(other)?,
        };
        let rendered = rendered.strip_suffix('\n').unwrap_or(&rendered);

        let mut lines = rendered.split('\n');
        let header = lines.next().unwrap_or_default();
        let body: Vec<&str> = lines.collect();

        if body.is_empty() {
            self.out.push_str(header);
            self.out.push('\n');
            return Ok(());
        }

        if header.starts_with('|') || header.starts_with('>') {
            let base = indentation_indicator(header).unwrap_or_else(|| {
                body.iter()
                    .find(|line| !line.trim().is_empty())
                    .map(|line| line.len() - line.trim_start_matches(' ').len())
                    .unwrap_or(0)
            });

            self.out.push_str(&with_indicator(header, child - parent));
            self.out.push('\n');
            for line in body {
                let text = line.get(base..).unwrap_or_default();
                if !text.is_empty() {
                    self.pad(child);
                    self.out.push_str(text);
                }
                self.out.push('\n');
            }
        } else {
            // folded flow scalar
            self.out.push_str(header);
            self.out.push('\n');
            for line in body {
                let text = line.trim_start();
                if !text.is_empty() {
                    self.pad(child);
                    self.out.push_str(text);
                }
                self.out.push('\n');
            }
        }
        Ok(())
    }
}

fn key_text(key: &Value) -> Result<String> {
    let rendered = scalar_text(key)?;
    let text = rendered.strip_suffix('\n').unwrap_or(&rendered);
    if text.contains('\n') {
        return Err(RenderError::Emit(format!(
            "mapping key {text:?} does not fit on one line"
        )));
    }
    Ok(text.to_string())
}

fn indentation_indicator(header: &str) -> Option<usize> {
    header
        .chars()
        .find_map(|c| c.to_digit(10))
        .map(|digit| digit as usize)
}

fn with_indicator(header: &str, relative: usize) -> String {
    match char::from_digit(relative as u32, 10) {
        Some(digit) if relative > 0 => header
            .chars()
            .map(|c| if c.is_ascii_digit() { digit } else { c })
            .collect(),
        _ => header.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn emit_str(yaml: &str) -> String {
        let value: Value = serde_yaml::from_str(yaml).unwrap();
        emit(&value).unwrap()
    }

    #[test]
    fn test_nested_blocks_use_four_columns() {
        let out = emit_str(
            "chpasswd:\n  users:\n  - name: root\n    password: RANDOM\n  expire: false\n",
        );
        assert_eq!(
            out,
            "chpasswd:\n    users:\n        - name: root\n          password: RANDOM\n    expire: false\n"
        );
    }

    #[test]
    fn test_lists_inside_sequence_items() {
        let out = emit_str("users:\n- name: myname\n  doas:\n  - do this\n  - do that\n");
        assert_eq!(
            out,
            "users:\n    - name: myname\n      doas:\n        - do this\n        - do that\n"
        );
    }

    #[test]
    fn test_scalar_quoting_is_delegated() {
        let out = emit_str("a: '123'\nb: 'true'\nc: echo '11'\nd: 14\ne: false\n");
        assert_eq!(out, "a: '123'\nb: 'true'\nc: echo '11'\nd: 14\ne: false\n");
    }

    #[test]
    fn test_yaml11_lookalikes_are_quoted() {
        let out = emit_str(
            "keyboard:\n  layout: \"no\"\nlocale: \"on\"\nruncmd:\n- \"yes\"\n- \"off\"\n- \"y\"\n- \"N\"\n- \"1_000\"\n- \"12:30\"\n- \"2001-12-14\"\n",
        );
        assert_eq!(
            out,
            "keyboard:\n    layout: 'no'\nlocale: 'on'\nruncmd:\n    - 'yes'\n    - 'off'\n    - 'y'\n    - 'N'\n    - '1_000'\n    - '12:30'\n    - '2001-12-14'\n"
        );
    }

    #[test]
    fn test_yaml11_lookalike_keys_are_quoted() {
        let out = emit_str("config:\n  \"off\": \"1\"\n");
        assert_eq!(out, "config:\n    'off': '1'\n");
    }

    #[test]
    fn test_plain_strings_stay_plain() {
        let out = emit_str("a: noble\nb: online\nc: 1.2.3\nd: en_US.UTF-8\n");
        assert_eq!(out, "a: noble\nb: online\nc: 1.2.3\nd: en_US.UTF-8\n");
    }

    #[test]
    fn test_empty_collections_use_flow_form() {
        let out = emit_str("growpart:\n  devices: []\nupdates:\n  network: {}\n");
        assert_eq!(out, "growpart:\n    devices: []\nupdates:\n    network: {}\n");
    }

    #[test]
    fn test_multiline_strings_become_literal_blocks() {
        let out = emit_str("final_message: \"first\\nsecond\"\n");
        assert_eq!(out, "final_message: |-\n    first\n    second\n");

        let out = emit_str("write_files:\n- path: /x\n  content: \"a\\n\\nb\\n\"\n");
        assert_eq!(
            out,
            "write_files:\n    - path: /x\n      content: |\n        a\n\n        b\n"
        );
    }

    #[test]
    fn test_multiline_key_is_rejected() {
        let mut map = Mapping::new();
        map.insert(Value::from("a\nb"), Value::from(1));
        let err = emit(&Value::Mapping(map)).unwrap_err();
        assert!(matches!(err, RenderError::Emit(_)));
    }

    #[test]
    fn test_root_must_be_mapping() {
        assert!(emit(&Value::from("x")).is_err());
        assert_eq!(emit(&Value::Mapping(Mapping::new())).unwrap(), "");
    }

    #[test]
    fn test_indicator_rewrite() {
        assert_eq!(indentation_indicator("|2-"), Some(2));
        assert_eq!(indentation_indicator("|-"), None);
        assert_eq!(with_indicator("|2-", 4), "|4-");
        assert_eq!(with_indicator("|+", 4), "|+");
    }
}
