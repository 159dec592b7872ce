// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Networking, time and phone-home modules

use crate::Setting;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct Fan {
    /// Inline fanatic configuration
    pub config: Setting<String>,
    /// Default: /etc/network/fan
    pub config_path: Setting<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum HotplugEvent {
    Boot,
    Hotplug,
    BootLegacy,
    BootNewInstance,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct NetworkUpdates {
    /// Events that trigger a network re-render
    pub when: Setting<Vec<HotplugEvent>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct Updates {
    pub network: Option<NetworkUpdates>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct NtpConfig {
    pub confpath: Setting<String>,
    pub check_exe: Setting<String>,
    pub packages: Setting<Vec<String>>,
    pub service_name: Setting<String>,
    pub template: Setting<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct Ntp {
    pub pools: Setting<Vec<String>>,
    pub servers: Setting<Vec<String>>,
    pub peers: Setting<Vec<String>>,
    /// Networks allowed to query this host
    pub allow: Setting<Vec<String>>,
    /// Client to install, e.g. `chrony` or `auto`
    pub ntp_client: Setting<String>,
    /// No fixed default: explicit values are always kept
    pub enabled: Setting<bool>,
    pub config: Option<NtpConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PhoneHomePost {
    PubKeyRsa,
    PubKeyEcdsa,
    #[serde(rename = "pub_key_ed25519")]
    PubKeyEd25519,
    InstanceId,
    Hostname,
    Fqdn,
    All,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct PhoneHome {
    pub url: Setting<String>,
    /// Default: 10
    pub tries: Setting<i64>,
    pub post: Setting<Vec<PhoneHomePost>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct WireguardInterface {
    pub name: Setting<String>,
    pub config_path: Setting<String>,
    pub content: Setting<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct Wireguard {
    pub interfaces: Setting<Vec<WireguardInterface>>,
    /// Commands run to check the tunnels are up
    pub readinessprobe: Setting<Vec<String>>,
}
