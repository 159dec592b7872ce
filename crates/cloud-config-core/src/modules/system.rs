// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Host identity, boot behaviour and hardware modules

use super::{explicit, list, non_empty, non_zero, unless_default, when_true};
use crate::document::CloudConfigDocument;
use crate::error::Result;
use crate::registry::Module;
use cloud_config_types::system::{
    self as input, ByobuMode, GrowpartMode, PowerStateMode, RandomSeedEncoding,
};
use cloud_config_types::{CloudConfig, Setting};
use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SetHostnameOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fqdn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefer_fqdn_over_hostname: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preserve_hostname: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_hostname_file: Option<bool>,
}

pub struct SetHostname;

impl Module for SetHostname {
    const ID: &'static str = "set_hostname";
    type Input = input::SetHostname;
    type Output = SetHostnameOutput;

    fn input(config: &CloudConfig) -> &Self::Input {
        &config.set_hostname
    }

    fn output(document: &mut CloudConfigDocument) -> &mut Self::Output {
        &mut document.set_hostname
    }

    fn transform(input: &Self::Input) -> Result<Self::Output> {
        Ok(SetHostnameOutput {
            hostname: non_empty(&input.hostname),
            fqdn: non_empty(&input.fqdn),
            prefer_fqdn_over_hostname: explicit(&input.prefer_fqdn_over_hostname),
            preserve_hostname: when_true(&input.preserve_hostname),
            create_hostname_file: unless_default(&input.create_hostname_file, true),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LocaleOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale_configfile: Option<String>,
}

pub struct Locale;

impl Module for Locale {
    const ID: &'static str = "locale";
    type Input = input::Locale;
    type Output = LocaleOutput;

    fn input(config: &CloudConfig) -> &Self::Input {
        &config.locale
    }

    fn output(document: &mut CloudConfigDocument) -> &mut Self::Output {
        &mut document.locale
    }

    fn transform(input: &Self::Input) -> Result<Self::Output> {
        Ok(LocaleOutput {
            locale: non_empty(&input.locale),
            locale_configfile: non_empty(&input.locale_configfile),
        })
    }
}

pub struct Timezone;

impl Module for Timezone {
    const ID: &'static str = "timezone";
    type Input = Setting<String>;
    type Output = Option<String>;

    fn input(config: &CloudConfig) -> &Self::Input {
        &config.timezone
    }

    fn output(document: &mut CloudConfigDocument) -> &mut Self::Output {
        &mut document.timezone
    }

    fn transform(input: &Self::Input) -> Result<Self::Output> {
        Ok(non_empty(input))
    }
}

pub struct RunCmd;

impl Module for RunCmd {
    const ID: &'static str = "runcmd";
    type Input = Setting<Vec<String>>;
    type Output = Option<Vec<String>>;

    fn input(config: &CloudConfig) -> &Self::Input {
        &config.runcmd
    }

    fn output(document: &mut CloudConfigDocument) -> &mut Self::Output {
        &mut document.runcmd
    }

    fn transform(input: &Self::Input) -> Result<Self::Output> {
        Ok(list(input))
    }
}

pub struct BootCmd;

impl Module for BootCmd {
    const ID: &'static str = "bootcmd";
    type Input = Setting<Vec<String>>;
    type Output = Option<Vec<String>>;

    fn input(config: &CloudConfig) -> &Self::Input {
        &config.bootcmd
    }

    fn output(document: &mut CloudConfigDocument) -> &mut Self::Output {
        &mut document.bootcmd
    }

    fn transform(input: &Self::Input) -> Result<Self::Output> {
        Ok(list(input))
    }
}

/// `manage_etc_hosts` is either a boolean or the string `localhost`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManageEtcHosts {
    Localhost,
    Enabled(bool),
}

impl Serialize for ManageEtcHosts {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            ManageEtcHosts::Localhost => serializer.serialize_str("localhost"),
            ManageEtcHosts::Enabled(enabled) => serializer.serialize_bool(*enabled),
        }
    }
}

pub struct UpdateEtcHosts;

impl Module for UpdateEtcHosts {
    const ID: &'static str = "update_etc_hosts";
    type Input = input::UpdateEtcHosts;
    type Output = Option<ManageEtcHosts>;

    fn input(config: &CloudConfig) -> &Self::Input {
        &config.etc_hosts
    }

    fn output(document: &mut CloudConfigDocument) -> &mut Self::Output {
        &mut document.manage_etc_hosts
    }

    fn transform(input: &Self::Input) -> Result<Self::Output> {
        if let Setting::Set(true) = input.manage_etc_hosts_localhost {
            return Ok(Some(ManageEtcHosts::Localhost));
        }
        Ok(explicit(&input.manage_etc_hosts).map(ManageEtcHosts::Enabled))
    }
}

pub struct Byobu;

impl Module for Byobu {
    const ID: &'static str = "byobu";
    type Input = Setting<ByobuMode>;
    type Output = Option<ByobuMode>;

    fn input(config: &CloudConfig) -> &Self::Input {
        &config.byobu_by_default
    }

    fn output(document: &mut CloudConfigDocument) -> &mut Self::Output {
        &mut document.byobu_by_default
    }

    fn transform(input: &Self::Input) -> Result<Self::Output> {
        Ok(explicit(input))
    }
}

pub struct FinalMessage;

impl Module for FinalMessage {
    const ID: &'static str = "final_message";
    type Input = Setting<String>;
    type Output = Option<String>;

    fn input(config: &CloudConfig) -> &Self::Input {
        &config.final_message
    }

    fn output(document: &mut CloudConfigDocument) -> &mut Self::Output {
        &mut document.final_message
    }

    fn transform(input: &Self::Input) -> Result<Self::Output> {
        Ok(non_empty(input))
    }
}

/// `devices` and `ignore_growroot_disabled` render whenever the block exists
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GrowpartOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<GrowpartMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub devices: Option<Vec<String>>,
    pub ignore_growroot_disabled: bool,
}

pub struct Growpart;

impl Module for Growpart {
    const ID: &'static str = "growpart";
    type Input = Option<input::Growpart>;
    type Output = Option<GrowpartOutput>;

    fn input(config: &CloudConfig) -> &Self::Input {
        &config.growpart
    }

    fn output(document: &mut CloudConfigDocument) -> &mut Self::Output {
        &mut document.growpart
    }

    fn transform(input: &Self::Input) -> Result<Self::Output> {
        Ok(input.as_ref().map(|growpart| GrowpartOutput {
            mode: explicit(&growpart.mode),
            devices: explicit(&growpart.devices),
            ignore_growroot_disabled: growpart.ignore_growroot_disabled.get() == Some(&true),
        }))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GrubDpkgOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(rename = "grub-pc/install_devices", skip_serializing_if = "Option::is_none")]
    pub grub_pc_install_devices: Option<String>,
    #[serde(rename = "grub-pc/install_devices_empty", skip_serializing_if = "Option::is_none")]
    pub grub_pc_install_devices_empty: Option<bool>,
    #[serde(rename = "grub-efi/install_devices", skip_serializing_if = "Option::is_none")]
    pub grub_efi_install_devices: Option<String>,
}

pub struct GrubDpkg;

impl Module for GrubDpkg {
    const ID: &'static str = "grub_dpkg";
    type Input = Option<input::GrubDpkg>;
    type Output = Option<GrubDpkgOutput>;

    fn input(config: &CloudConfig) -> &Self::Input {
        &config.grub_dpkg
    }

    fn output(document: &mut CloudConfigDocument) -> &mut Self::Output {
        &mut document.grub_dpkg
    }

    fn transform(input: &Self::Input) -> Result<Self::Output> {
        Ok(input.as_ref().map(|grub| GrubDpkgOutput {
            enabled: when_true(&grub.enabled),
            grub_pc_install_devices: non_empty(&grub.grub_pc_install_devices),
            // the default is computed on the host, so an explicit false matters
            grub_pc_install_devices_empty: explicit(&grub.grub_pc_install_devices_empty),
            grub_efi_install_devices: non_empty(&grub.grub_efi_install_devices),
        }))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KeyboardOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<String>,
}

pub struct Keyboard;

impl Module for Keyboard {
    const ID: &'static str = "keyboard";
    type Input = Option<input::Keyboard>;
    type Output = Option<KeyboardOutput>;

    fn input(config: &CloudConfig) -> &Self::Input {
        &config.keyboard
    }

    fn output(document: &mut CloudConfigDocument) -> &mut Self::Output {
        &mut document.keyboard
    }

    fn transform(input: &Self::Input) -> Result<Self::Output> {
        Ok(input.as_ref().map(|keyboard| KeyboardOutput {
            layout: non_empty(&keyboard.layout),
            model: non_empty(&keyboard.model),
            variant: non_empty(&keyboard.variant),
            options: non_empty(&keyboard.options),
        }))
    }
}

/// `resize_rootfs` is either `false` or the string `noblock`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeRootfs {
    Disabled,
    NoBlock,
}

impl Serialize for ResizeRootfs {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            ResizeRootfs::Disabled => serializer.serialize_bool(false),
            ResizeRootfs::NoBlock => serializer.serialize_str("noblock"),
        }
    }
}

pub struct Resizefs;

impl Module for Resizefs {
    const ID: &'static str = "resizefs";
    type Input = input::Resizefs;
    type Output = Option<ResizeRootfs>;

    fn input(config: &CloudConfig) -> &Self::Input {
        &config.resizefs
    }

    fn output(document: &mut CloudConfigDocument) -> &mut Self::Output {
        &mut document.resize_rootfs
    }

    fn transform(input: &Self::Input) -> Result<Self::Output> {
        if let Setting::Set(false) = input.resize_rootfs {
            return Ok(Some(ResizeRootfs::Disabled));
        }
        Ok(when_true(&input.resize_rootfs_no_block).map(|_| ResizeRootfs::NoBlock))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AutoinstallOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<i32>,
}

pub struct UbuntuAutoinstall;

impl Module for UbuntuAutoinstall {
    const ID: &'static str = "ubuntu_autoinstall";
    type Input = Option<input::Autoinstall>;
    type Output = Option<AutoinstallOutput>;

    fn input(config: &CloudConfig) -> &Self::Input {
        &config.autoinstall
    }

    fn output(document: &mut CloudConfigDocument) -> &mut Self::Output {
        &mut document.autoinstall
    }

    fn transform(input: &Self::Input) -> Result<Self::Output> {
        Ok(input.as_ref().map(|autoinstall| AutoinstallOutput {
            version: non_zero(&autoinstall.version),
        }))
    }
}

/// `power_state.delay` is either `now` or a number of minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerStateDelay {
    Now,
    Minutes(i64),
}

impl Serialize for PowerStateDelay {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            PowerStateDelay::Now => serializer.serialize_str("now"),
            PowerStateDelay::Minutes(minutes) => serializer.serialize_i64(*minutes),
        }
    }
}

/// `power_state.condition` is either a command line or a boolean.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PowerStateCondition {
    Command(String),
    Flag(bool),
}

impl Serialize for PowerStateCondition {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            PowerStateCondition::Command(command) => serializer.serialize_str(command),
            PowerStateCondition::Flag(flag) => serializer.serialize_bool(*flag),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PowerStateOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay: Option<PowerStateDelay>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<PowerStateMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<PowerStateCondition>,
}

pub struct PowerStateChange;

impl Module for PowerStateChange {
    const ID: &'static str = "power_state_change";
    type Input = Option<input::PowerState>;
    type Output = Option<PowerStateOutput>;

    fn input(config: &CloudConfig) -> &Self::Input {
        &config.power_state
    }

    fn output(document: &mut CloudConfigDocument) -> &mut Self::Output {
        &mut document.power_state
    }

    fn transform(input: &Self::Input) -> Result<Self::Output> {
        Ok(input.as_ref().map(|power| {
            let delay = match (&power.no_delay, &power.delay) {
                (Setting::Set(true), _) => Some(PowerStateDelay::Now),
                (_, Setting::Set(minutes)) => Some(PowerStateDelay::Minutes(*minutes)),
                _ => None,
            };
            let condition = match non_empty(&power.condition_cmd) {
                Some(command) => Some(PowerStateCondition::Command(command)),
                None => explicit(&power.condition).map(PowerStateCondition::Flag),
            };

            PowerStateOutput {
                delay,
                mode: explicit(&power.mode),
                message: non_empty(&power.message),
                timeout: non_zero(&power.timeout),
                condition,
            }
        }))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RpiSerialOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub console: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hardware: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RpiInterfacesOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spi: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub i2c: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssh: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial: Option<RpiSerialOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub onewire: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_gpio: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RpiOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interfaces: Option<RpiInterfacesOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_rpi_connect: Option<bool>,
}

pub struct Rpi;

impl Module for Rpi {
    const ID: &'static str = "rpi";
    type Input = Option<input::Rpi>;
    type Output = Option<RpiOutput>;

    fn input(config: &CloudConfig) -> &Self::Input {
        &config.rpi
    }

    fn output(document: &mut CloudConfigDocument) -> &mut Self::Output {
        &mut document.rpi
    }

    fn transform(input: &Self::Input) -> Result<Self::Output> {
        Ok(input.as_ref().map(|rpi| RpiOutput {
            interfaces: rpi.interfaces.as_ref().map(|interfaces| RpiInterfacesOutput {
                spi: when_true(&interfaces.spi),
                i2c: when_true(&interfaces.i2c),
                ssh: when_true(&interfaces.ssh),
                serial: interfaces.serial.as_ref().map(|serial| RpiSerialOutput {
                    console: when_true(&serial.console),
                    hardware: when_true(&serial.hardware),
                }),
                onewire: when_true(&interfaces.onewire),
                remote_gpio: when_true(&interfaces.remote_gpio),
            }),
            enable_rpi_connect: when_true(&rpi.enable_rpi_connect),
        }))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RandomSeedOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<RandomSeedEncoding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command_required: Option<bool>,
}

pub struct SeedRandom;

impl Module for SeedRandom {
    const ID: &'static str = "seed_random";
    type Input = Option<input::RandomSeed>;
    type Output = Option<RandomSeedOutput>;

    fn input(config: &CloudConfig) -> &Self::Input {
        &config.random_seed
    }

    fn output(document: &mut CloudConfigDocument) -> &mut Self::Output {
        &mut document.random_seed
    }

    fn transform(input: &Self::Input) -> Result<Self::Output> {
        Ok(input.as_ref().map(|seed| RandomSeedOutput {
            file: non_empty(&seed.file),
            data: non_empty(&seed.data),
            encoding: explicit(&seed.encoding),
            command: list(&seed.command),
            command_required: when_true(&seed.command_required),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_hostname_file_only_renders_false() {
        let mut hostname = input::SetHostname::default();
        assert_eq!(SetHostname::transform(&hostname).unwrap().create_hostname_file, None);

        hostname.create_hostname_file = Setting::Set(true);
        assert_eq!(SetHostname::transform(&hostname).unwrap().create_hostname_file, None);

        hostname.create_hostname_file = Setting::Set(false);
        assert_eq!(
            SetHostname::transform(&hostname).unwrap().create_hostname_file,
            Some(false)
        );
    }

    #[test]
    fn test_manage_etc_hosts_precedence() {
        let mut hosts = input::UpdateEtcHosts::default();
        assert_eq!(UpdateEtcHosts::transform(&hosts).unwrap(), None);

        hosts.manage_etc_hosts = Setting::Set(false);
        assert_eq!(
            UpdateEtcHosts::transform(&hosts).unwrap(),
            Some(ManageEtcHosts::Enabled(false))
        );

        hosts.manage_etc_hosts = Setting::Unset;
        hosts.manage_etc_hosts_localhost = Setting::Set(true);
        assert_eq!(UpdateEtcHosts::transform(&hosts).unwrap(), Some(ManageEtcHosts::Localhost));
    }

    #[test]
    fn test_resize_rootfs_variants() {
        let mut resize = input::Resizefs::default();
        assert_eq!(Resizefs::transform(&resize).unwrap(), None);

        resize.resize_rootfs = Setting::Set(true);
        assert_eq!(Resizefs::transform(&resize).unwrap(), None);

        resize.resize_rootfs_no_block = Setting::Set(true);
        assert_eq!(Resizefs::transform(&resize).unwrap(), Some(ResizeRootfs::NoBlock));

        resize.resize_rootfs = Setting::Set(false);
        assert_eq!(Resizefs::transform(&resize).unwrap(), Some(ResizeRootfs::Disabled));
    }

    #[test]
    fn test_power_state_polymorphic_fields() {
        let power = input::PowerState {
            no_delay: Setting::Set(true),
            condition_cmd: Setting::Set("test -f /run/done".to_string()),
            mode: Setting::Set(PowerStateMode::Reboot),
            timeout: Setting::Set(0),
            ..Default::default()
        };
        let out = PowerStateChange::transform(&Some(power)).unwrap().unwrap();
        assert_eq!(out.delay, Some(PowerStateDelay::Now));
        assert_eq!(
            out.condition,
            Some(PowerStateCondition::Command("test -f /run/done".to_string()))
        );
        assert_eq!(out.timeout, None);

        let power = input::PowerState {
            delay: Setting::Set(0),
            condition: Setting::Set(false),
            ..Default::default()
        };
        let out = PowerStateChange::transform(&Some(power)).unwrap().unwrap();
        assert_eq!(out.delay, Some(PowerStateDelay::Minutes(0)));
        assert_eq!(out.condition, Some(PowerStateCondition::Flag(false)));
    }

    #[test]
    fn test_growpart_keeps_block_level_fields() {
        let out = Growpart::transform(&Some(input::Growpart::default())).unwrap().unwrap();
        assert_eq!(out.mode, None);
        assert_eq!(out.devices, None);
        assert!(!out.ignore_growroot_disabled);

        let growpart = input::Growpart {
            devices: Setting::Set(vec![]),
            ..Default::default()
        };
        let out = Growpart::transform(&Some(growpart)).unwrap().unwrap();
        assert_eq!(out.devices, Some(vec![]));
    }

    #[test]
    fn test_absent_block_stays_absent() {
        assert_eq!(Keyboard::transform(&None).unwrap(), None);
        assert_eq!(Rpi::transform(&None).unwrap(), None);
    }
}
