// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Strongly-typed input shapes for every cloud-config module.
//!
//! Each module contributes either a handful of flat root keys (its struct is
//! flattened into [`CloudConfig`]) or one nested block under its own key.
//! Every scalar is wrapped in [`Setting`] so that "not given" survives
//! decoding as a state of its own.

pub mod access;
pub mod files;
pub mod network;
pub mod packages;
pub mod setting;
pub mod system;

pub use setting::Setting;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// String keyed map whose values are expected to be scalars
pub type ScalarMap = BTreeMap<String, serde_json::Value>;

/// The Aggregate Input: the union of all module inputs for one document.
///
/// Flat modules are flattened into root properties, block modules keep their
/// own key. Unknown root keys are rejected by the generated schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
#[schemars(deny_unknown_fields)]
pub struct CloudConfig {
    #[serde(flatten)]
    pub set_hostname: system::SetHostname,
    #[serde(flatten)]
    pub locale: system::Locale,
    pub timezone: Setting<String>,
    /// Commands run late in boot, once per instance
    pub runcmd: Setting<Vec<String>>,
    /// Commands run early in boot, on every boot
    pub bootcmd: Setting<Vec<String>>,
    #[serde(flatten)]
    pub etc_hosts: system::UpdateEtcHosts,
    /// Keys added to the default user
    pub ssh_authorized_keys: Setting<Vec<String>>,
    #[serde(flatten)]
    pub set_passwords: access::SetPasswords,
    #[serde(flatten)]
    pub packages: packages::PackageUpdateUpgrade,
    #[serde(flatten)]
    pub users_and_groups: access::UsersAndGroups,
    pub disable_ec2_metadata: Setting<bool>,
    pub apk_repos: Option<packages::ApkRepos>,
    pub apt_pipelining: Option<packages::AptPipelining>,
    pub byobu_by_default: Setting<system::ByobuMode>,
    pub ca_certs: Option<packages::CaCerts>,
    pub fan: Option<network::Fan>,
    /// Message written to the console once boot is finished
    pub final_message: Setting<String>,
    pub growpart: Option<system::Growpart>,
    pub grub_dpkg: Option<system::GrubDpkg>,
    pub updates: Option<network::Updates>,
    pub keyboard: Option<system::Keyboard>,
    #[serde(flatten)]
    pub keys_to_console: access::KeysToConsole,
    #[serde(flatten)]
    pub resizefs: system::Resizefs,
    pub salt_minion: Option<packages::SaltMinion>,
    pub autoinstall: Option<system::Autoinstall>,
    pub power_state: Option<system::PowerState>,
    pub phone_home: Option<network::PhoneHome>,
    pub landscape: Option<packages::Landscape>,
    pub ntp: Option<network::Ntp>,
    pub rpi: Option<system::Rpi>,
    pub random_seed: Option<system::RandomSeed>,
    pub wireguard: Option<network::Wireguard>,
    pub zypper: Option<packages::Zypper>,
    pub write_files: Setting<Vec<files::WriteFile>>,
    pub spacewalk: Option<packages::Spacewalk>,
}
