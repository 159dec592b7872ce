// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use super::{explicit, non_empty, records, string_map, when_true};
use crate::document::CloudConfigDocument;
use crate::error::Result;
use crate::registry::Module;
use cloud_config_types::files::{self as input, WriteFileEncoding};
use cloud_config_types::{CloudConfig, Setting};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WriteFileSourceOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WriteFileOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<WriteFileEncoding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub append: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defer: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<WriteFileSourceOutput>,
}

pub struct WriteFiles;

impl Module for WriteFiles {
    const ID: &'static str = "write_files";
    type Input = Setting<Vec<input::WriteFile>>;
    type Output = Option<Vec<WriteFileOutput>>;

    fn input(config: &CloudConfig) -> &Self::Input {
        &config.write_files
    }

    fn output(document: &mut CloudConfigDocument) -> &mut Self::Output {
        &mut document.write_files
    }

    fn transform(input: &Self::Input) -> Result<Self::Output> {
        records(input, |file| {
            let source = match &file.source {
                Some(source) => Some(WriteFileSourceOutput {
                    uri: non_empty(&source.uri),
                    headers: string_map(Self::ID, "source.headers", &source.headers)?,
                }),
                None => None,
            };

            Ok(WriteFileOutput {
                path: non_empty(&file.path),
                content: non_empty(&file.content),
                owner: non_empty(&file.owner),
                permissions: non_empty(&file.permissions),
                encoding: explicit(&file.encoding),
                append: when_true(&file.append),
                defer: when_true(&file.defer),
                source,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RenderError;

    #[test]
    fn test_write_file_record() {
        let file = input::WriteFile {
            path: Setting::Set("/etc/motd".to_string()),
            content: Setting::Set("hello\n".to_string()),
            encoding: Setting::Set(WriteFileEncoding::TextPlain),
            append: Setting::Set(false),
            defer: Setting::Set(true),
            ..Default::default()
        };

        let out = WriteFiles::transform(&Setting::Set(vec![file])).unwrap().unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].path.as_deref(), Some("/etc/motd"));
        assert_eq!(out[0].append, None);
        assert_eq!(out[0].defer, Some(true));
        assert_eq!(serde_json::to_value(out[0].encoding).unwrap(), "text/plain");
    }

    #[test]
    fn test_source_headers_must_be_scalars() {
        let file = input::WriteFile {
            source: Some(input::WriteFileSource {
                uri: Setting::Set("https://example.com/file".to_string()),
                headers: Setting::Set(
                    [("Authorization".to_string(), serde_json::json!({"a": 1}))]
                        .into_iter()
                        .collect(),
                ),
            }),
            ..Default::default()
        };

        let err = WriteFiles::transform(&Setting::Set(vec![file])).unwrap_err();
        assert!(matches!(
            err,
            RenderError::Transform { module: "write_files", ref field, .. }
                if field == "source.headers.Authorization"
        ));
    }

    #[test]
    fn test_empty_list_is_omitted() {
        assert_eq!(WriteFiles::transform(&Setting::Set(vec![])).unwrap(), None);
        assert_eq!(WriteFiles::transform(&Setting::Unset).unwrap(), None);
    }
}
