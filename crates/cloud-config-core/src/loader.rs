// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Input layer loading, schema validation and typed decoding

use crate::error::{RenderError, Result};
use crate::merge::merge_two_json;
use cloud_config_types::CloudConfig;
use serde_json::Value as J;
use std::fmt;
use std::path::Path;
use std::sync::OnceLock;

/// Text formats accepted for input layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum InputFormat {
    #[default]
    Yaml,
    Json,
    Toml,
}

impl InputFormat {
    /// Guess the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InputFormat::Yaml => "yaml",
            InputFormat::Json => "json",
            InputFormat::Toml => "toml",
        };
        f.write_str(name)
    }
}

/// One parsed input document, before merging
#[derive(Debug, Clone)]
pub struct Layer {
    /// File path or `<stdin>`
    pub origin: String,
    pub json: J,
}

/// Parse one input document into a JSON tree.
///
/// Empty documents are treated as an empty mapping; any other non-mapping
/// top level is rejected.
pub fn parse_layer(text: &str, format: InputFormat) -> Result<J> {
    let parse_error = |message: String| RenderError::Parse { format, message };

    if text.trim().is_empty() {
        return Ok(J::Object(Default::default()));
    }

    let json = match format {
        InputFormat::Yaml => {
            serde_yaml::from_str::<J>(text).map_err(|e| parse_error(e.to_string()))?
        }
        InputFormat::Json => {
            serde_json::from_str::<J>(text).map_err(|e| parse_error(e.to_string()))?
        }
        InputFormat::Toml => {
            let table: toml::Value = toml::from_str(text).map_err(|e| parse_error(e.to_string()))?;
            serde_json::to_value(table).map_err(|e| parse_error(e.to_string()))?
        }
    };

    match json {
        J::Object(_) => Ok(json),
        J::Null => Ok(J::Object(Default::default())),
        _ => Err(parse_error("top level must be a mapping".to_string())),
    }
}

/// Read and parse a layer from disk.
///
/// Without an explicit format the file extension decides, falling back to YAML.
pub fn read_layer(path: &Path, format: Option<InputFormat>) -> Result<Layer> {
    let text = std::fs::read_to_string(path)?;
    let format = format
        .or_else(|| InputFormat::from_path(path))
        .unwrap_or_default();

    tracing::debug!(path = %path.display(), %format, "reading input layer");
    Ok(Layer {
        origin: path.display().to_string(),
        json: parse_layer(&text, format)?,
    })
}

/// Merge layers in order, later layers winning.
pub fn merge_layers(layers: impl IntoIterator<Item = Layer>) -> J {
    let mut merged = J::Object(Default::default());
    for layer in layers {
        tracing::trace!(origin = %layer.origin, "merging input layer");
        merge_two_json(&mut merged, layer.json);
    }
    merged
}

/// JSON Schema of the aggregate input.
pub fn schema() -> &'static J {
    static SCHEMA: OnceLock<J> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        let root = schemars::schema_for!(CloudConfig);
        let mut schema = serde_json::to_value(root).unwrap_or(J::Null);
        // flattened fields make schemars drop `deny_unknown_fields` on the root
        if let Some(object) = schema.as_object_mut() {
            object.insert("additionalProperties".to_string(), J::Bool(false));
        }
        schema
    })
}

/// Validate a merged input tree against the generated schema.
///
/// Every violation is collected, not only the first.
pub fn validate_against_schema(v: &J) -> Result<()> {
    use jsonschema::{Draft, JSONSchema};

    static VALIDATOR: OnceLock<std::result::Result<JSONSchema, String>> = OnceLock::new();
    let validator = VALIDATOR.get_or_init(|| {
        JSONSchema::options()
            .with_draft(Draft::Draft202012)
            .compile(schema())
            .map_err(|e| e.to_string())
    });

    let validator = match validator {
        Ok(validator) => validator,
        Err(e) => {
            return Err(RenderError::Schema(vec![format!(
                "schema compilation failed: {e}"
            )]))
        }
    };

    if let Err(errors) = validator.validate(v) {
        let messages: Vec<String> = errors
            .map(|e| {
                let path = e.instance_path.to_string();
                if path.is_empty() {
                    e.to_string()
                } else {
                    format!("{path}: {e}")
                }
            })
            .collect();
        return Err(RenderError::Schema(messages));
    }

    Ok(())
}

/// Decode a validated input tree into the typed aggregate.
pub fn decode(v: &J) -> Result<CloudConfig> {
    serde_path_to_error::deserialize(v).map_err(|e| RenderError::Decode {
        path: e.path().to_string(),
        message: e.inner().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_format_from_path() {
        assert_eq!(InputFormat::from_path(Path::new("a.yml")), Some(InputFormat::Yaml));
        assert_eq!(InputFormat::from_path(Path::new("a.TOML")), Some(InputFormat::Toml));
        assert_eq!(InputFormat::from_path(Path::new("a.json")), Some(InputFormat::Json));
        assert_eq!(InputFormat::from_path(Path::new("a")), None);
    }

    #[test]
    fn test_parse_layer_formats_agree() {
        let yaml = parse_layer("hostname: two\nruncmd:\n  - ls\n", InputFormat::Yaml).unwrap();
        let json = parse_layer(r#"{"hostname": "two", "runcmd": ["ls"]}"#, InputFormat::Json)
            .unwrap();
        let toml = parse_layer("hostname = \"two\"\nruncmd = [\"ls\"]\n", InputFormat::Toml)
            .unwrap();

        assert_eq!(yaml, json);
        assert_eq!(json, toml);
    }

    #[test]
    fn test_parse_layer_rejects_non_mapping() {
        let err = parse_layer("- a\n- b\n", InputFormat::Yaml).unwrap_err();
        assert!(matches!(err, RenderError::Parse { format: InputFormat::Yaml, .. }));

        assert_eq!(parse_layer("  \n", InputFormat::Json).unwrap(), json!({}));
    }

    #[test]
    fn test_parse_error_names_format() {
        let err = parse_layer("hostname = ", InputFormat::Toml).unwrap_err();
        assert!(err.to_string().starts_with("Input parse error (toml)"));
    }

    #[test]
    fn test_read_layer_uses_extension() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"timezone": "UTC"}}"#).unwrap();

        let layer = read_layer(file.path(), None).unwrap();
        assert_eq!(layer.json, json!({"timezone": "UTC"}));
    }

    #[test]
    fn test_merge_layers_in_order() {
        let layers = vec![
            Layer {
                origin: "a".into(),
                json: json!({"hostname": "one", "timezone": "UTC"}),
            },
            Layer {
                origin: "b".into(),
                json: json!({"hostname": "two"}),
            },
        ];
        assert_eq!(
            merge_layers(layers),
            json!({"hostname": "two", "timezone": "UTC"})
        );
    }

    #[test]
    fn test_schema_accepts_valid_input() {
        validate_against_schema(&json!({
            "hostname": "two",
            "create_hostname_file": false,
            "manage_etc_hosts": null,
            "growpart": {"mode": "auto", "devices": []},
            "users": [{"name": "a", "uid": 0}],
        }))
        .unwrap();
    }

    #[test]
    fn test_schema_rejects_wrong_types_and_values() {
        let err = validate_against_schema(&json!({
            "hostname": 5,
            "byobu_by_default": "sometimes",
        }))
        .unwrap_err();

        match err {
            RenderError::Schema(messages) => {
                assert!(messages.len() >= 2, "{messages:?}");
                assert!(messages.iter().any(|m| m.starts_with("/hostname")));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_schema_rejects_unknown_nested_keys() {
        assert!(validate_against_schema(&json!({"growpart": {"size": 3}})).is_err());
    }

    #[test]
    fn test_decode_reports_path() {
        let err = decode(&json!({"power_state": {"delay": "soon"}})).unwrap_err();
        match err {
            RenderError::Decode { path, .. } => assert_eq!(path, "power_state.delay"),
            other => panic!("unexpected error {other:?}"),
        }
    }
}
