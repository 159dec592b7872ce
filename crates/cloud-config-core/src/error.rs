// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use crate::loader::InputFormat;
use thiserror::Error;

/// Convenient result alias for document generation.
pub type Result<T> = std::result::Result<T, RenderError>;

/// Errors that can occur while accepting input or producing a document.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Underlying IO error while reading an input layer.
    #[error("Input IO error: {0}")]
    Io(#[from] std::io::Error),

    /// An input layer is not valid text in its format.
    #[error("Input parse error ({format}): {message}")]
    Parse { format: InputFormat, message: String },

    /// The merged input does not match the generated schema.
    #[error("Input schema validation failed:\n  - {}", .0.join("\n  - "))]
    Schema(Vec<String>),

    /// Fields declared mutually exclusive were set together.
    #[error("Conflicting fields at {scope}: {} cannot be set together", .fields.join(", "))]
    Conflict { scope: String, fields: Vec<String> },

    /// The merged input could not be decoded into the typed aggregate.
    #[error("Input decoding error at '{path}': {message}")]
    Decode { path: String, message: String },

    /// A module could not cast a composite value into its output shape.
    #[error("Module '{module}' cannot decode '{field}': {reason}")]
    Transform {
        module: &'static str,
        field: String,
        reason: String,
    },

    /// The output aggregate could not be encoded.
    #[error("Document serialization error: {0}")]
    Serialize(#[from] serde_yaml::Error),

    /// The encoded tree has a shape the block emitter cannot write.
    #[error("Document emit error: {0}")]
    Emit(String),
}
