// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! `write_files` entries

use crate::{ScalarMap, Setting};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum WriteFileEncoding {
    #[serde(rename = "gz")]
    Gz,
    #[serde(rename = "gzip")]
    Gzip,
    #[serde(rename = "gz+base64")]
    GzBase64,
    #[serde(rename = "gzip+base64")]
    GzipBase64,
    #[serde(rename = "gz+b64")]
    GzB64,
    #[serde(rename = "gzip+b64")]
    GzipB64,
    #[serde(rename = "b64")]
    B64,
    #[serde(rename = "base64")]
    Base64,
    #[serde(rename = "text/plain")]
    TextPlain,
}

/// Remote content for a file, fetched at boot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct WriteFileSource {
    pub uri: Setting<String>,
    /// Extra request headers. Values must be scalars
    pub headers: Setting<ScalarMap>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct WriteFile {
    pub path: Setting<String>,
    pub content: Setting<String>,
    /// Default: root:root
    pub owner: Setting<String>,
    /// Octal mode string. Default: 0644
    pub permissions: Setting<String>,
    pub encoding: Setting<WriteFileEncoding>,
    pub append: Setting<bool>,
    /// Write after users and packages are set up
    pub defer: Setting<bool>,
    pub source: Option<WriteFileSource>,
}
