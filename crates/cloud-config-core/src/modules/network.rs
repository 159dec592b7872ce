// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Networking, time sync and instance reporting modules

use super::{explicit, list, non_empty, non_zero, records, when_true};
use crate::document::CloudConfigDocument;
use crate::error::Result;
use crate::registry::Module;
use cloud_config_types::network::{self as input, HotplugEvent, PhoneHomePost};
use cloud_config_types::{CloudConfig, Setting};
use serde::Serialize;

pub struct DisableEc2Metadata;

impl Module for DisableEc2Metadata {
    const ID: &'static str = "disable_ec2_metadata";
    type Input = Setting<bool>;
    type Output = Option<bool>;

    fn input(config: &CloudConfig) -> &Self::Input {
        &config.disable_ec2_metadata
    }

    fn output(document: &mut CloudConfigDocument) -> &mut Self::Output {
        &mut document.disable_ec2_metadata
    }

    fn transform(input: &Self::Input) -> Result<Self::Output> {
        Ok(when_true(input))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FanOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_path: Option<String>,
}

pub struct Fan;

impl Module for Fan {
    const ID: &'static str = "fan";
    type Input = Option<input::Fan>;
    type Output = Option<FanOutput>;

    fn input(config: &CloudConfig) -> &Self::Input {
        &config.fan
    }

    fn output(document: &mut CloudConfigDocument) -> &mut Self::Output {
        &mut document.fan
    }

    fn transform(input: &Self::Input) -> Result<Self::Output> {
        Ok(input.as_ref().map(|fan| FanOutput {
            config: non_empty(&fan.config),
            config_path: non_empty(&fan.config_path),
        }))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NetworkUpdatesOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub when: Option<Vec<HotplugEvent>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdatesOutput {
    pub network: NetworkUpdatesOutput,
}

pub struct InstallHotplug;

impl Module for InstallHotplug {
    const ID: &'static str = "install_hotplug";
    type Input = Option<input::Updates>;
    type Output = Option<UpdatesOutput>;

    fn input(config: &CloudConfig) -> &Self::Input {
        &config.updates
    }

    fn output(document: &mut CloudConfigDocument) -> &mut Self::Output {
        &mut document.updates
    }

    fn transform(input: &Self::Input) -> Result<Self::Output> {
        let network = input.as_ref().and_then(|updates| updates.network.as_ref());
        Ok(network.map(|network| UpdatesOutput {
            network: NetworkUpdatesOutput {
                when: list(&network.when),
            },
        }))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PhoneHomeOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tries: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<Vec<PhoneHomePost>>,
}

pub struct PhoneHome;

impl Module for PhoneHome {
    const ID: &'static str = "phone_home";
    type Input = Option<input::PhoneHome>;
    type Output = Option<PhoneHomeOutput>;

    fn input(config: &CloudConfig) -> &Self::Input {
        &config.phone_home
    }

    fn output(document: &mut CloudConfigDocument) -> &mut Self::Output {
        &mut document.phone_home
    }

    fn transform(input: &Self::Input) -> Result<Self::Output> {
        Ok(input.as_ref().map(|phone_home| PhoneHomeOutput {
            url: non_empty(&phone_home.url),
            tries: non_zero(&phone_home.tries),
            post: list(&phone_home.post),
        }))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NtpConfigOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confpath: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_exe: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub packages: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NtpOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pools: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub servers: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peers: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ntp_client: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<NtpConfigOutput>,
}

pub struct Ntp;

impl Module for Ntp {
    const ID: &'static str = "ntp";
    type Input = Option<input::Ntp>;
    type Output = Option<NtpOutput>;

    fn input(config: &CloudConfig) -> &Self::Input {
        &config.ntp
    }

    fn output(document: &mut CloudConfigDocument) -> &mut Self::Output {
        &mut document.ntp
    }

    fn transform(input: &Self::Input) -> Result<Self::Output> {
        Ok(input.as_ref().map(|ntp| NtpOutput {
            pools: list(&ntp.pools),
            servers: list(&ntp.servers),
            peers: list(&ntp.peers),
            allow: list(&ntp.allow),
            ntp_client: non_empty(&ntp.ntp_client),
            enabled: explicit(&ntp.enabled),
            config: ntp.config.as_ref().map(|config| NtpConfigOutput {
                confpath: non_empty(&config.confpath),
                check_exe: non_empty(&config.check_exe),
                packages: list(&config.packages),
                service_name: non_empty(&config.service_name),
                template: non_empty(&config.template),
            }),
        }))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WireguardInterfaceOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WireguardOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interfaces: Option<Vec<WireguardInterfaceOutput>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub readinessprobe: Option<Vec<String>>,
}

pub struct Wireguard;

impl Module for Wireguard {
    const ID: &'static str = "wireguard";
    type Input = Option<input::Wireguard>;
    type Output = Option<WireguardOutput>;

    fn input(config: &CloudConfig) -> &Self::Input {
        &config.wireguard
    }

    fn output(document: &mut CloudConfigDocument) -> &mut Self::Output {
        &mut document.wireguard
    }

    fn transform(input: &Self::Input) -> Result<Self::Output> {
        let Some(wireguard) = input else {
            return Ok(None);
        };

        Ok(Some(WireguardOutput {
            interfaces: records(&wireguard.interfaces, |interface| {
                Ok(WireguardInterfaceOutput {
                    name: non_empty(&interface.name),
                    config_path: non_empty(&interface.config_path),
                    content: non_empty(&interface.content),
                })
            })?,
            readinessprobe: list(&wireguard.readinessprobe),
        }))
    }
}
