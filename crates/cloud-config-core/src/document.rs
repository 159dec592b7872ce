// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! The aggregate output written after the `#cloud-config` preamble.
//!
//! Field order here is key order in the rendered document. Modules owning
//! several top-level keys contribute a flattened struct.

use crate::modules::access::{
    KeysToConsoleOutput, SetPasswordsOutput, UsersAndGroupsOutput,
};
use crate::modules::files::WriteFileOutput;
use crate::modules::network::{
    FanOutput, NtpOutput, PhoneHomeOutput, UpdatesOutput, WireguardOutput,
};
use crate::modules::packages::{
    ApkReposOutput, AptPipeliningValue, CaCertsOutput, LandscapeOutput,
    PackageUpdateUpgradeOutput, SaltMinionOutput, SpacewalkOutput, ZypperOutput,
};
use crate::modules::system::{
    AutoinstallOutput, GrowpartOutput, GrubDpkgOutput, KeyboardOutput, LocaleOutput,
    ManageEtcHosts, PowerStateOutput, RandomSeedOutput, ResizeRootfs, RpiOutput,
    SetHostnameOutput,
};
use cloud_config_types::system::ByobuMode;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CloudConfigDocument {
    #[serde(flatten)]
    pub set_hostname: SetHostnameOutput,
    #[serde(flatten)]
    pub locale: LocaleOutput,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runcmd: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bootcmd: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manage_etc_hosts: Option<ManageEtcHosts>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssh_authorized_keys: Option<Vec<String>>,
    #[serde(flatten)]
    pub set_passwords: SetPasswordsOutput,
    #[serde(flatten)]
    pub packages: PackageUpdateUpgradeOutput,
    #[serde(flatten)]
    pub users_and_groups: UsersAndGroupsOutput,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_ec2_metadata: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apk_repos: Option<ApkReposOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apt_pipelining: Option<AptPipeliningValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub byobu_by_default: Option<ByobuMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ca_certs: Option<CaCertsOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fan: Option<FanOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub growpart: Option<GrowpartOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grub_dpkg: Option<GrubDpkgOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updates: Option<UpdatesOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyboard: Option<KeyboardOutput>,
    #[serde(flatten)]
    pub keys_to_console: KeysToConsoleOutput,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resize_rootfs: Option<ResizeRootfs>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salt_minion: Option<SaltMinionOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autoinstall: Option<AutoinstallOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power_state: Option<PowerStateOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_home: Option<PhoneHomeOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub landscape: Option<LandscapeOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ntp: Option<NtpOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rpi: Option<RpiOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub random_seed: Option<RandomSeedOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wireguard: Option<WireguardOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zypper: Option<ZypperOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub write_files: Option<Vec<WriteFileOutput>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spacewalk: Option<SpacewalkOutput>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_serializes_to_empty_mapping() {
        let value = serde_yaml::to_value(CloudConfigDocument::default()).unwrap();
        assert_eq!(value, serde_yaml::Value::Mapping(Default::default()));
    }

    #[test]
    fn test_flattened_keys_follow_field_order() {
        let document = CloudConfigDocument {
            set_hostname: SetHostnameOutput {
                hostname: Some("one".to_string()),
                ..Default::default()
            },
            timezone: Some("UTC".to_string()),
            set_passwords: SetPasswordsOutput {
                ssh_pwauth: Some(true),
                chpasswd: None,
            },
            spacewalk: Some(SpacewalkOutput::default()),
            ..Default::default()
        };

        let value = serde_yaml::to_value(&document).unwrap();
        let keys: Vec<_> = value
            .as_mapping()
            .unwrap()
            .keys()
            .map(|k| k.as_str().unwrap().to_string())
            .collect();
        assert_eq!(keys, ["hostname", "timezone", "ssh_pwauth", "spacewalk"]);
    }
}
