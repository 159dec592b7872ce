// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Package manager, repository and management agent modules

use crate::{ScalarMap, Setting};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// `package_update_upgrade_install`: flattened into the root
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct PackageUpdateUpgrade {
    /// Refresh the package index on first boot. Default: false
    pub package_update: Setting<bool>,
    /// Upgrade installed packages on first boot. Default: false
    pub package_upgrade: Setting<bool>,
    /// Reboot when an upgrade asks for it. Default: false
    pub package_reboot_if_required: Setting<bool>,
    pub packages: Setting<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct AlpineRepo {
    pub community_enabled: Setting<bool>,
    pub testing_enabled: Setting<bool>,
    pub base_url: Setting<String>,
    /// Alpine release, e.g. `v3.20` or `edge`
    pub version: Setting<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct ApkRepos {
    pub preserve_repositories: Setting<bool>,
    pub local_repo_base_url: Setting<String>,
    pub alpine_repo: Option<AlpineRepo>,
}

/// APT pipelining depth. `os`, `disable` and `depth` are alternatives.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct AptPipelining {
    /// Keep the distribution's default
    pub os: Setting<bool>,
    /// Turn pipelining off
    pub disable: Setting<bool>,
    /// Explicit number of pipelined requests
    pub depth: Setting<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct CaCerts {
    /// Drop the distribution's default trust store
    pub remove_defaults: Setting<bool>,
    /// PEM encoded certificates to trust
    pub trusted: Setting<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct ZypperRepo {
    pub id: Setting<String>,
    pub baseurl: Setting<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct Zypper {
    pub repos: Setting<Vec<ZypperRepo>>,
    /// zypp.conf overrides. Values must be scalars
    pub config: Setting<ScalarMap>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct Spacewalk {
    pub server: Setting<String>,
    pub proxy: Setting<String>,
    pub activation_key: Setting<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct SaltMinion {
    pub pkg_name: Setting<String>,
    pub service_name: Setting<String>,
    pub config_dir: Setting<String>,
    pub public_key: Setting<String>,
    pub private_key: Setting<String>,
    pub pki_dir: Setting<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum LandscapeLogLevel {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct LandscapeClient {
    pub url: Setting<String>,
    pub ping_url: Setting<String>,
    pub data_path: Setting<String>,
    pub log_level: Setting<LandscapeLogLevel>,
    pub computer_title: Setting<String>,
    pub account_name: Setting<String>,
    pub registration_key: Setting<String>,
    /// Comma separated tag list
    pub tags: Setting<String>,
    pub http_proxy: Setting<String>,
    pub https_proxy: Setting<String>,
}

/// Landscape is only rendered when `client` is present
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct Landscape {
    pub client: Option<LandscapeClient>,
}
