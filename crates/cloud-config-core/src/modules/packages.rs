// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Package managers, repositories and management agents

use super::{explicit, list, non_empty, records, string_map, when_true};
use crate::document::CloudConfigDocument;
use crate::error::Result;
use crate::registry::Module;
use cloud_config_types::packages::{self as input, LandscapeLogLevel};
use cloud_config_types::CloudConfig;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PackageUpdateUpgradeOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_update: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_upgrade: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_reboot_if_required: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub packages: Option<Vec<String>>,
}

pub struct PackageUpdateUpgrade;

impl Module for PackageUpdateUpgrade {
    const ID: &'static str = "package_update_upgrade_install";
    type Input = input::PackageUpdateUpgrade;
    type Output = PackageUpdateUpgradeOutput;

    fn input(config: &CloudConfig) -> &Self::Input {
        &config.packages
    }

    fn output(document: &mut CloudConfigDocument) -> &mut Self::Output {
        &mut document.packages
    }

    fn transform(input: &Self::Input) -> Result<Self::Output> {
        Ok(PackageUpdateUpgradeOutput {
            package_update: when_true(&input.package_update),
            package_upgrade: when_true(&input.package_upgrade),
            package_reboot_if_required: when_true(&input.package_reboot_if_required),
            packages: list(&input.packages),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AlpineRepoOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub community_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub testing_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ApkReposOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preserve_repositories: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_repo_base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alpine_repo: Option<AlpineRepoOutput>,
}

pub struct ApkConfigure;

impl Module for ApkConfigure {
    const ID: &'static str = "apk_configure";
    type Input = Option<input::ApkRepos>;
    type Output = Option<ApkReposOutput>;

    fn input(config: &CloudConfig) -> &Self::Input {
        &config.apk_repos
    }

    fn output(document: &mut CloudConfigDocument) -> &mut Self::Output {
        &mut document.apk_repos
    }

    fn transform(input: &Self::Input) -> Result<Self::Output> {
        Ok(input.as_ref().map(|apk| ApkReposOutput {
            preserve_repositories: when_true(&apk.preserve_repositories),
            local_repo_base_url: non_empty(&apk.local_repo_base_url),
            alpine_repo: apk.alpine_repo.as_ref().map(|repo| AlpineRepoOutput {
                community_enabled: when_true(&repo.community_enabled),
                testing_enabled: when_true(&repo.testing_enabled),
                base_url: non_empty(&repo.base_url),
                version: non_empty(&repo.version),
            }),
        }))
    }
}

/// `apt_pipelining` is the string `os`, `false`, or a pipeline depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AptPipeliningValue {
    Os,
    Disabled,
    Depth(i32),
}

impl Serialize for AptPipeliningValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            AptPipeliningValue::Os => serializer.serialize_str("os"),
            AptPipeliningValue::Disabled => serializer.serialize_bool(false),
            AptPipeliningValue::Depth(depth) => serializer.serialize_i32(*depth),
        }
    }
}

pub struct AptPipelining;

impl Module for AptPipelining {
    const ID: &'static str = "apt_pipelining";
    type Input = Option<input::AptPipelining>;
    type Output = Option<AptPipeliningValue>;

    fn input(config: &CloudConfig) -> &Self::Input {
        &config.apt_pipelining
    }

    fn output(document: &mut CloudConfigDocument) -> &mut Self::Output {
        &mut document.apt_pipelining
    }

    fn transform(input: &Self::Input) -> Result<Self::Output> {
        let Some(apt) = input else {
            return Ok(None);
        };

        if when_true(&apt.os).is_some() {
            return Ok(Some(AptPipeliningValue::Os));
        }
        if when_true(&apt.disable).is_some() {
            return Ok(Some(AptPipeliningValue::Disabled));
        }
        Ok(explicit(&apt.depth).map(AptPipeliningValue::Depth))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CaCertsOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remove_defaults: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trusted: Option<Vec<String>>,
}

pub struct CaCerts;

impl Module for CaCerts {
    const ID: &'static str = "ca_certs";
    type Input = Option<input::CaCerts>;
    type Output = Option<CaCertsOutput>;

    fn input(config: &CloudConfig) -> &Self::Input {
        &config.ca_certs
    }

    fn output(document: &mut CloudConfigDocument) -> &mut Self::Output {
        &mut document.ca_certs
    }

    fn transform(input: &Self::Input) -> Result<Self::Output> {
        Ok(input.as_ref().map(|certs| CaCertsOutput {
            remove_defaults: when_true(&certs.remove_defaults),
            trusted: list(&certs.trusted),
        }))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SaltMinionOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pkg_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_dir: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pki_dir: Option<String>,
}

pub struct SaltMinion;

impl Module for SaltMinion {
    const ID: &'static str = "salt_minion";
    type Input = Option<input::SaltMinion>;
    type Output = Option<SaltMinionOutput>;

    fn input(config: &CloudConfig) -> &Self::Input {
        &config.salt_minion
    }

    fn output(document: &mut CloudConfigDocument) -> &mut Self::Output {
        &mut document.salt_minion
    }

    fn transform(input: &Self::Input) -> Result<Self::Output> {
        Ok(input.as_ref().map(|salt| SaltMinionOutput {
            pkg_name: non_empty(&salt.pkg_name),
            service_name: non_empty(&salt.service_name),
            config_dir: non_empty(&salt.config_dir),
            public_key: non_empty(&salt.public_key),
            private_key: non_empty(&salt.private_key),
            pki_dir: non_empty(&salt.pki_dir),
        }))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LandscapeClientOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ping_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<LandscapeLogLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub computer_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_proxy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub https_proxy: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LandscapeOutput {
    pub client: LandscapeClientOutput,
}

pub struct Landscape;

impl Module for Landscape {
    const ID: &'static str = "landscape";
    type Input = Option<input::Landscape>;
    type Output = Option<LandscapeOutput>;

    fn input(config: &CloudConfig) -> &Self::Input {
        &config.landscape
    }

    fn output(document: &mut CloudConfigDocument) -> &mut Self::Output {
        &mut document.landscape
    }

    fn transform(input: &Self::Input) -> Result<Self::Output> {
        let client = input.as_ref().and_then(|landscape| landscape.client.as_ref());
        Ok(client.map(|client| LandscapeOutput {
            client: LandscapeClientOutput {
                url: non_empty(&client.url),
                ping_url: non_empty(&client.ping_url),
                data_path: non_empty(&client.data_path),
                log_level: explicit(&client.log_level),
                computer_title: non_empty(&client.computer_title),
                account_name: non_empty(&client.account_name),
                registration_key: non_empty(&client.registration_key),
                tags: non_empty(&client.tags),
                http_proxy: non_empty(&client.http_proxy),
                https_proxy: non_empty(&client.https_proxy),
            },
        }))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ZypperRepoOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseurl: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ZypperOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repos: Option<Vec<ZypperRepoOutput>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<BTreeMap<String, String>>,
}

pub struct ZypperAddRepo;

impl Module for ZypperAddRepo {
    const ID: &'static str = "zypper_add_repo";
    type Input = Option<input::Zypper>;
    type Output = Option<ZypperOutput>;

    fn input(config: &CloudConfig) -> &Self::Input {
        &config.zypper
    }

    fn output(document: &mut CloudConfigDocument) -> &mut Self::Output {
        &mut document.zypper
    }

    fn transform(input: &Self::Input) -> Result<Self::Output> {
        let Some(zypper) = input else {
            return Ok(None);
        };

        Ok(Some(ZypperOutput {
            repos: records(&zypper.repos, |repo| {
                Ok(ZypperRepoOutput {
                    id: non_empty(&repo.id),
                    baseurl: non_empty(&repo.baseurl),
                })
            })?,
            config: string_map(Self::ID, "config", &zypper.config)?,
        }))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SpacewalkOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activation_key: Option<String>,
}

pub struct Spacewalk;

impl Module for Spacewalk {
    const ID: &'static str = "spacewalk";
    type Input = Option<input::Spacewalk>;
    type Output = Option<SpacewalkOutput>;

    fn input(config: &CloudConfig) -> &Self::Input {
        &config.spacewalk
    }

    fn output(document: &mut CloudConfigDocument) -> &mut Self::Output {
        &mut document.spacewalk
    }

    fn transform(input: &Self::Input) -> Result<Self::Output> {
        Ok(input.as_ref().map(|spacewalk| SpacewalkOutput {
            server: non_empty(&spacewalk.server),
            proxy: non_empty(&spacewalk.proxy),
            activation_key: non_empty(&spacewalk.activation_key),
        }))
    }
}
