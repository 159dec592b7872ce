// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Accounts, credentials and SSH key handling

use super::{explicit, list, non_empty, records, unless_default, when_true};
use crate::document::CloudConfigDocument;
use crate::error::Result;
use crate::registry::Module;
use cloud_config_types::access as input;
use cloud_config_types::{CloudConfig, Setting};
use serde::Serialize;

pub struct Ssh;

impl Module for Ssh {
    const ID: &'static str = "ssh";
    type Input = Setting<Vec<String>>;
    type Output = Option<Vec<String>>;

    fn input(config: &CloudConfig) -> &Self::Input {
        &config.ssh_authorized_keys
    }

    fn output(document: &mut CloudConfigDocument) -> &mut Self::Output {
        &mut document.ssh_authorized_keys
    }

    fn transform(input: &Self::Input) -> Result<Self::Output> {
        Ok(list(input))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChPasswdUserOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChPasswdOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub users: Option<Vec<ChPasswdUserOutput>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expire: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SetPasswordsOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssh_pwauth: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chpasswd: Option<ChPasswdOutput>,
}

pub struct SetPasswords;

impl Module for SetPasswords {
    const ID: &'static str = "set_passwords";
    type Input = input::SetPasswords;
    type Output = SetPasswordsOutput;

    fn input(config: &CloudConfig) -> &Self::Input {
        &config.set_passwords
    }

    fn output(document: &mut CloudConfigDocument) -> &mut Self::Output {
        &mut document.set_passwords
    }

    fn transform(input: &Self::Input) -> Result<Self::Output> {
        let chpasswd = match &input.chpasswd {
            Some(chpasswd) => Some(ChPasswdOutput {
                users: records(&chpasswd.users, |user| {
                    Ok(ChPasswdUserOutput {
                        name: non_empty(&user.name),
                        password: non_empty(&user.password),
                        kind: non_empty(&user.kind),
                    })
                })?,
                expire: unless_default(&chpasswd.expire, true),
            }),
            None => None,
        };

        Ok(SetPasswordsOutput {
            ssh_pwauth: explicit(&input.ssh_pwauth),
            chpasswd,
        })
    }
}

/// One account record as written to `user` or `users`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doas: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiredate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gecos: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homedir: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inactive: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lock_passwd: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_create_home: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_log_init: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_user_group: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passwd: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hashed_passwd: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plain_text_passwd: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_groups: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selinux_user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shell: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapuser: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssh_authorized_keys: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssh_import_id: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssh_redirect_user: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sudo: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<String>>,
}

impl From<&input::User> for UserOutput {
    fn from(user: &input::User) -> Self {
        Self {
            name: non_empty(&user.name),
            doas: list(&user.doas),
            expiredate: non_empty(&user.expiredate),
            gecos: non_empty(&user.gecos),
            homedir: non_empty(&user.homedir),
            inactive: non_empty(&user.inactive),
            lock_passwd: unless_default(&user.lock_passwd, true),
            no_create_home: when_true(&user.no_create_home),
            no_log_init: when_true(&user.no_log_init),
            no_user_group: when_true(&user.no_user_group),
            passwd: non_empty(&user.passwd),
            hashed_passwd: non_empty(&user.hashed_passwd),
            plain_text_passwd: non_empty(&user.plain_text_passwd),
            create_groups: explicit(&user.create_groups),
            primary_group: non_empty(&user.primary_group),
            selinux_user: non_empty(&user.selinux_user),
            shell: non_empty(&user.shell),
            snapuser: non_empty(&user.snapuser),
            ssh_authorized_keys: list(&user.ssh_authorized_keys),
            ssh_import_id: list(&user.ssh_import_id),
            ssh_redirect_user: when_true(&user.ssh_redirect_user),
            system: when_true(&user.system),
            // uid 0 is a real account
            uid: explicit(&user.uid),
            sudo: list(&user.sudo),
            groups: list(&user.groups),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UsersAndGroupsOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub users: Option<Vec<UserOutput>>,
}

pub struct UsersAndGroups;

impl Module for UsersAndGroups {
    const ID: &'static str = "users_and_groups";
    type Input = input::UsersAndGroups;
    type Output = UsersAndGroupsOutput;

    fn input(config: &CloudConfig) -> &Self::Input {
        &config.users_and_groups
    }

    fn output(document: &mut CloudConfigDocument) -> &mut Self::Output {
        &mut document.users_and_groups
    }

    fn transform(input: &Self::Input) -> Result<Self::Output> {
        Ok(UsersAndGroupsOutput {
            groups: list(&input.groups),
            user: input.user.as_ref().map(UserOutput::from),
            users: records(&input.users, |user| Ok(UserOutput::from(user)))?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SshConsoleOutput {
    pub emit_keys_to_console: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KeysToConsoleOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssh: Option<SshConsoleOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssh_key_console_blacklist: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssh_fp_console_blacklist: Option<Vec<String>>,
}

pub struct KeysToConsole;

impl Module for KeysToConsole {
    const ID: &'static str = "keys_to_console";
    type Input = input::KeysToConsole;
    type Output = KeysToConsoleOutput;

    fn input(config: &CloudConfig) -> &Self::Input {
        &config.keys_to_console
    }

    fn output(document: &mut CloudConfigDocument) -> &mut Self::Output {
        &mut document.keys_to_console
    }

    fn transform(input: &Self::Input) -> Result<Self::Output> {
        let ssh = input
            .ssh
            .as_ref()
            .and_then(|ssh| unless_default(&ssh.emit_keys_to_console, true))
            .map(|emit_keys_to_console| SshConsoleOutput {
                emit_keys_to_console,
            });

        Ok(KeysToConsoleOutput {
            ssh,
            ssh_key_console_blacklist: list(&input.ssh_key_console_blacklist),
            ssh_fp_console_blacklist: list(&input.ssh_fp_console_blacklist),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_user_record_rules() {
        let user = input::User {
            name: Setting::Set("myname".to_string()),
            lock_passwd: Setting::Set(true),
            create_groups: Setting::Set(true),
            uid: Setting::Set(0),
            no_create_home: Setting::Set(false),
            ..Default::default()
        };

        let out = UserOutput::from(&user);
        assert_eq!(out.name.as_deref(), Some("myname"));
        assert_eq!(out.lock_passwd, None);
        assert_eq!(out.create_groups, Some(true));
        assert_eq!(out.uid, Some(0));
        assert_eq!(out.no_create_home, None);
    }

    #[test]
    fn test_lock_passwd_false_is_kept() {
        let user = input::User {
            lock_passwd: Setting::Set(false),
            ..Default::default()
        };
        assert_eq!(UserOutput::from(&user).lock_passwd, Some(false));
    }

    #[test]
    fn test_chpasswd_expire_default_is_omitted() {
        let passwords = input::SetPasswords {
            ssh_pwauth: Setting::Set(false),
            chpasswd: Some(input::ChPasswd {
                users: Setting::Set(vec![input::ChPasswdUser {
                    name: Setting::Set("root".to_string()),
                    password: Setting::Set("RANDOM".to_string()),
                    kind: Setting::Unset,
                }]),
                expire: Setting::Set(true),
            }),
        };

        let out = SetPasswords::transform(&passwords).unwrap();
        assert_eq!(out.ssh_pwauth, Some(false));
        let chpasswd = out.chpasswd.unwrap();
        assert_eq!(chpasswd.expire, None);
        assert_eq!(
            chpasswd.users,
            Some(vec![ChPasswdUserOutput {
                name: Some("root".to_string()),
                password: Some("RANDOM".to_string()),
                kind: None,
            }])
        );
    }

    #[test]
    fn test_keys_to_console_ssh_only_when_disabled() {
        let mut keys = input::KeysToConsole {
            ssh: Some(input::SshConsole {
                emit_keys_to_console: Setting::Set(true),
            }),
            ..Default::default()
        };
        assert_eq!(KeysToConsole::transform(&keys).unwrap().ssh, None);

        keys.ssh = Some(input::SshConsole {
            emit_keys_to_console: Setting::Set(false),
        });
        assert_eq!(
            KeysToConsole::transform(&keys).unwrap().ssh,
            Some(SshConsoleOutput {
                emit_keys_to_console: false
            })
        );
    }
}
