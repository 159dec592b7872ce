// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! The `render` command

use anyhow::{Context, Result};
use clap::Args;
use cloud_config_core::loader::{parse_layer, read_layer};
use cloud_config_core::merge::insert_dotted;
use cloud_config_core::{render_layers, InputFormat, Layer};
use serde_json::Value as J;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

#[derive(Args, Clone, Debug)]
pub struct RenderArgs {
    /// Input files merged left to right; `-` or no file reads stdin
    pub inputs: Vec<PathBuf>,

    /// Input format, taken from each file extension when omitted
    #[arg(long, value_enum)]
    pub format: Option<InputFormat>,

    /// Override a single input value, e.g. `--set power_state.mode=reboot`
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_override)]
    pub overrides: Vec<(String, J)>,

    /// Write the document to a file instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

impl RenderArgs {
    pub fn run(self) -> Result<()> {
        let document = self.document(io::stdin().lock())?;

        match &self.output {
            Some(path) => fs::write(path, format!("{document}\n"))
                .with_context(|| format!("writing {}", path.display()))?,
            None => writeln!(io::stdout().lock(), "{document}")?,
        }
        Ok(())
    }

    /// Read every layer, apply overrides and render.
    pub fn document(&self, stdin: impl Read) -> Result<String> {
        let mut layers = self.layers(stdin)?;

        if !self.overrides.is_empty() {
            let mut json = J::Object(Default::default());
            for (key, value) in &self.overrides {
                insert_dotted(&mut json, key, value.clone());
            }
            layers.push(Layer {
                origin: "--set".to_string(),
                json,
            });
        }

        render_layers(layers).context("rendering cloud-config document")
    }

    fn layers(&self, mut stdin: impl Read) -> Result<Vec<Layer>> {
        let stdin_only = [PathBuf::from("-")];
        let inputs = if self.inputs.is_empty() {
            &stdin_only[..]
        } else {
            &self.inputs[..]
        };

        let mut layers = Vec::with_capacity(inputs.len() + 1);
        for path in inputs {
            if path.as_os_str() == "-" {
                let mut text = String::new();
                stdin
                    .read_to_string(&mut text)
                    .context("reading input from stdin")?;
                layers.push(Layer {
                    origin: "<stdin>".to_string(),
                    json: parse_layer(&text, self.format.unwrap_or_default())?,
                });
            } else {
                let layer = read_layer(path, self.format)
                    .with_context(|| format!("reading {}", path.display()))?;
                layers.push(layer);
            }
        }
        Ok(layers)
    }
}

/// Parse `KEY=VALUE`, reading VALUE as a YAML scalar or flow collection.
pub fn parse_override(s: &str) -> std::result::Result<(String, J), String> {
    let (key, raw) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{s}`"))?;

    if key.split('.').any(str::is_empty) {
        return Err(format!("invalid key `{key}`"));
    }

    let value = if raw.is_empty() {
        J::String(String::new())
    } else {
        serde_yaml::from_str::<J>(raw).map_err(|e| format!("invalid value for `{key}`: {e}"))?
    };
    Ok((key.to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_override_value_types() {
        assert_eq!(
            parse_override("power_state.mode=reboot").unwrap(),
            ("power_state.mode".to_string(), json!("reboot"))
        );
        assert_eq!(
            parse_override("apt_pipelining.depth=14").unwrap().1,
            json!(14)
        );
        assert_eq!(parse_override("ssh_pwauth=false").unwrap().1, json!(false));
        assert_eq!(parse_override("runcmd=[ls, pwd]").unwrap().1, json!(["ls", "pwd"]));
        assert_eq!(parse_override("final_message=").unwrap().1, json!(""));
    }

    #[test]
    fn test_parse_override_rejects_malformed() {
        assert!(parse_override("hostname").is_err());
        assert!(parse_override("=x").is_err());
        assert!(parse_override("power_state..mode=x").is_err());
    }
}
