// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Host identity, boot behaviour and hardware modules

use crate::Setting;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// `set_hostname`: flattened into the root
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SetHostname {
    /// Hostname to set
    pub hostname: Setting<String>,
    /// Fully qualified domain name to set
    pub fqdn: Setting<String>,
    /// Use the FQDN as hostname on distros that support it. Default is distro-dependent
    pub prefer_fqdn_over_hostname: Setting<bool>,
    /// Leave the existing hostname untouched. Default: false
    pub preserve_hostname: Setting<bool>,
    /// Create /etc/hostname if it is missing. Default: true
    pub create_hostname_file: Setting<bool>,
}

/// `locale`: flattened into the root
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Locale {
    pub locale: Setting<String>,
    /// Path of the locale config file
    pub locale_configfile: Setting<String>,
}

/// `update_etc_hosts`: flattened into the root.
///
/// `manage_etc_hosts` and `manage_etc_hosts_localhost` are two ways of
/// writing the same key and must not both be set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct UpdateEtcHosts {
    /// Render /etc/hosts from the template on every boot
    pub manage_etc_hosts: Setting<bool>,
    /// Only manage the entry pointing at the local hostname
    pub manage_etc_hosts_localhost: Setting<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ByobuMode {
    EnableSystem,
    EnableUser,
    DisableSystem,
    DisableUser,
    Enable,
    Disable,
    User,
    System,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct Keyboard {
    pub layout: Setting<String>,
    pub model: Setting<String>,
    pub variant: Setting<String>,
    pub options: Setting<String>,
}

/// `resizefs`: flattened into the root
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Resizefs {
    /// Resize the root filesystem. Default: true
    pub resize_rootfs: Setting<bool>,
    /// Resize in the background instead of blocking boot
    pub resize_rootfs_no_block: Setting<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum GrowpartMode {
    Auto,
    Growpart,
    Gpart,
    Off,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct Growpart {
    /// Default: auto
    pub mode: Setting<GrowpartMode>,
    /// Devices or mount points to grow. Default: ["/"]
    pub devices: Setting<Vec<String>>,
    /// Ignore the presence of /etc/growroot-disabled. Default: false
    pub ignore_growroot_disabled: Setting<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct GrubDpkg {
    pub enabled: Setting<bool>,
    /// Device for `grub-pc/install_devices`
    pub grub_pc_install_devices: Setting<String>,
    /// Unset means: true when `grub_pc_install_devices` is empty
    pub grub_pc_install_devices_empty: Setting<bool>,
    /// Partition for `grub-efi/install_devices`
    pub grub_efi_install_devices: Setting<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum RandomSeedEncoding {
    Raw,
    Base64,
    B64,
    Gzip,
    Gz,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct RandomSeed {
    /// File to write random data to. Default: /dev/urandom
    pub file: Setting<String>,
    pub data: Setting<String>,
    pub encoding: Setting<RandomSeedEncoding>,
    /// Command to run for seeding entropy
    pub command: Setting<Vec<String>>,
    /// Fail if `command` cannot be located
    pub command_required: Setting<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct RpiSerial {
    pub console: Setting<bool>,
    pub hardware: Setting<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct RpiInterfaces {
    pub spi: Setting<bool>,
    pub i2c: Setting<bool>,
    pub ssh: Setting<bool>,
    pub serial: Option<RpiSerial>,
    pub onewire: Setting<bool>,
    pub remote_gpio: Setting<bool>,
}

/// Raspberry Pi interface toggles
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct Rpi {
    pub interfaces: Option<RpiInterfaces>,
    pub enable_rpi_connect: Setting<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct Autoinstall {
    pub version: Setting<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum PowerStateMode {
    Poweroff,
    Halt,
    Reboot,
}

/// Shutdown or reboot once cloud-init has finished.
///
/// `delay` and `no_delay` are alternatives, as are `condition` and
/// `condition_cmd`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct PowerState {
    /// Minutes to wait before acting
    pub delay: Setting<i64>,
    /// Act immediately
    pub no_delay: Setting<bool>,
    pub mode: Setting<PowerStateMode>,
    /// Message shown to logged in users
    pub message: Setting<String>,
    /// Seconds to wait for cloud-init to finish. Default: 30
    pub timeout: Setting<i64>,
    /// Whether to act at all. Default: true
    pub condition: Setting<bool>,
    /// Command whose success gates the action
    pub condition_cmd: Setting<String>,
}
