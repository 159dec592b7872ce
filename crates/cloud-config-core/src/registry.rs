// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! The fixed, ordered module registry.

use crate::document::CloudConfigDocument;
use crate::error::Result;
use crate::modules::{access, files, network, packages, system};
use cloud_config_types::CloudConfig;

/// One configuration module: a pure mapping from its input slice to its output slice.
pub trait Module {
    /// Registry identifier, also used when reporting failures
    const ID: &'static str;

    type Input;
    type Output;

    /// Select this module's slice of the aggregate input.
    fn input(config: &CloudConfig) -> &Self::Input;

    /// Select this module's slice of the aggregate output.
    fn output(document: &mut CloudConfigDocument) -> &mut Self::Output;

    fn transform(input: &Self::Input) -> Result<Self::Output>;
}

type Apply = fn(&CloudConfig, &mut CloudConfigDocument) -> Result<()>;

/// A registry entry
#[derive(Clone, Copy)]
pub struct Registration {
    pub id: &'static str,
    apply: Apply,
}

impl Registration {
    const fn of<M: Module>() -> Self {
        Self {
            id: M::ID,
            apply: apply::<M>,
        }
    }

    pub fn apply(&self, config: &CloudConfig, document: &mut CloudConfigDocument) -> Result<()> {
        (self.apply)(config, document)
    }
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration").field("id", &self.id).finish()
    }
}

fn apply<M: Module>(config: &CloudConfig, document: &mut CloudConfigDocument) -> Result<()> {
    let output = M::transform(M::input(config))?;
    *M::output(document) = output;
    Ok(())
}

/// All modules in execution order.
pub const MODULES: &[Registration] = &[
    Registration::of::<system::SetHostname>(),
    Registration::of::<system::Locale>(),
    Registration::of::<system::Timezone>(),
    Registration::of::<system::RunCmd>(),
    Registration::of::<system::BootCmd>(),
    Registration::of::<system::UpdateEtcHosts>(),
    Registration::of::<access::Ssh>(),
    Registration::of::<access::SetPasswords>(),
    Registration::of::<packages::PackageUpdateUpgrade>(),
    Registration::of::<access::UsersAndGroups>(),
    Registration::of::<network::DisableEc2Metadata>(),
    Registration::of::<packages::ApkConfigure>(),
    Registration::of::<packages::AptPipelining>(),
    Registration::of::<system::Byobu>(),
    Registration::of::<packages::CaCerts>(),
    Registration::of::<network::Fan>(),
    Registration::of::<system::FinalMessage>(),
    Registration::of::<system::Growpart>(),
    Registration::of::<system::GrubDpkg>(),
    Registration::of::<network::InstallHotplug>(),
    Registration::of::<system::Keyboard>(),
    Registration::of::<access::KeysToConsole>(),
    Registration::of::<system::Resizefs>(),
    Registration::of::<packages::SaltMinion>(),
    Registration::of::<system::UbuntuAutoinstall>(),
    Registration::of::<system::PowerStateChange>(),
    Registration::of::<network::PhoneHome>(),
    Registration::of::<packages::Landscape>(),
    Registration::of::<network::Ntp>(),
    Registration::of::<system::Rpi>(),
    Registration::of::<system::SeedRandom>(),
    Registration::of::<network::Wireguard>(),
    Registration::of::<packages::ZypperAddRepo>(),
    Registration::of::<files::WriteFiles>(),
    Registration::of::<packages::Spacewalk>(),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_module_ids_are_unique() {
        let ids: BTreeSet<_> = MODULES.iter().map(|m| m.id).collect();
        assert_eq!(ids.len(), MODULES.len());
    }

    #[test]
    fn test_registry_order_starts_with_identity_modules() {
        let ids: Vec<_> = MODULES.iter().take(5).map(|m| m.id).collect();
        assert_eq!(ids, ["set_hostname", "locale", "timezone", "runcmd", "bootcmd"]);
        assert_eq!(MODULES.last().map(|m| m.id), Some("spacewalk"));
    }
}
