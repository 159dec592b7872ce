// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Transform engine for `#cloud-config` documents.
//!
//! An input tree passes through schema validation, the mutual exclusion
//! checks and typed decoding. Every registered module then maps its slice of
//! the [`CloudConfig`] onto its slice of the [`CloudConfigDocument`], which
//! is finally written as block YAML after the preamble line.

pub mod constraints;
pub mod document;
pub mod emit;
pub mod error;
pub mod loader;
pub mod merge;
pub mod modules;
pub mod registry;

pub use cloud_config_types::{CloudConfig, Setting};
pub use document::CloudConfigDocument;
pub use error::{RenderError, Result};
pub use loader::{InputFormat, Layer};
pub use registry::{Module, Registration, MODULES};

use serde_json::Value as J;

/// First line of every generated document
pub const PREAMBLE: &str = "#cloud-config";

/// Render a typed aggregate input.
///
/// The exclusion checks run against the serialized input, so typed callers
/// get the same rejections as textual ones.
pub fn render(config: &CloudConfig) -> Result<String> {
    let input = serde_json::to_value(config).map_err(|e| RenderError::Decode {
        path: String::new(),
        message: e.to_string(),
    })?;
    if let Err(err) = constraints::check(&input) {
        tracing::warn!(error = %err, "rejected input");
        return Err(err);
    }
    serialize(&build(config)?)
}

/// Render an untyped input tree, as merged from text layers.
pub fn render_value(input: &J) -> Result<String> {
    let config = accept(input).inspect_err(|err| {
        tracing::warn!(error = %err, "rejected input");
    })?;
    serialize(&build(&config)?)
}

/// Merge layers in order and render the result.
pub fn render_layers(layers: impl IntoIterator<Item = Layer>) -> Result<String> {
    render_value(&loader::merge_layers(layers))
}

fn accept(input: &J) -> Result<CloudConfig> {
    loader::validate_against_schema(input)?;
    constraints::check(input)?;
    loader::decode(input)
}

/// Run every registered module in order; the first failure aborts.
pub fn build(config: &CloudConfig) -> Result<CloudConfigDocument> {
    let mut document = CloudConfigDocument::default();
    for module in MODULES {
        tracing::debug!(module = module.id, "running module transform");
        module.apply(config, &mut document)?;
    }
    Ok(document)
}

/// Encode a document, preamble included.
pub fn serialize(document: &CloudConfigDocument) -> Result<String> {
    let tree = serde_yaml::to_value(document)?;
    let body = emit::emit(&tree)?;
    let text = format!("{PREAMBLE}\n{body}").trim().to_string();

    tracing::info!(bytes = text.len(), "rendered document");
    Ok(text)
}
