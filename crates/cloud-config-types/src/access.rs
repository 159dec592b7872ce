// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Accounts, passwords and SSH related modules

use crate::Setting;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct ChPasswdUser {
    pub name: Setting<String>,
    pub password: Setting<String>,
    /// `hash`, `text` or `RANDOM`
    #[serde(rename = "type")]
    pub kind: Setting<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct ChPasswd {
    pub users: Setting<Vec<ChPasswdUser>>,
    /// Force a password change on first login. Default: true
    pub expire: Setting<bool>,
}

/// `set_passwords`: flattened into the root
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SetPasswords {
    /// Toggle sshd password authentication. No fixed default
    pub ssh_pwauth: Setting<bool>,
    pub chpasswd: Option<ChPasswd>,
}

/// One account record, used both for `user` and for every `users` entry.
///
/// `ssh_redirect_user` cannot be combined with `ssh_authorized_keys` or
/// `ssh_import_id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct User {
    pub name: Setting<String>,
    /// doas rules for this user
    pub doas: Setting<Vec<String>>,
    /// Account expiry date
    pub expiredate: Setting<String>,
    pub gecos: Setting<String>,
    pub homedir: Setting<String>,
    /// Days after password expiry before the account is disabled
    pub inactive: Setting<String>,
    /// Disable password login. Default: true
    pub lock_passwd: Setting<bool>,
    pub no_create_home: Setting<bool>,
    pub no_log_init: Setting<bool>,
    pub no_user_group: Setting<bool>,
    pub passwd: Setting<String>,
    pub hashed_passwd: Setting<String>,
    pub plain_text_passwd: Setting<String>,
    /// Create the groups listed for this user. Default: true
    pub create_groups: Setting<bool>,
    pub primary_group: Setting<String>,
    pub selinux_user: Setting<String>,
    pub shell: Setting<String>,
    pub snapuser: Setting<String>,
    pub ssh_authorized_keys: Setting<Vec<String>>,
    pub ssh_import_id: Setting<Vec<String>>,
    /// Reject SSH logins for this user and point at the default user instead
    pub ssh_redirect_user: Setting<bool>,
    pub system: Setting<bool>,
    pub uid: Setting<i32>,
    pub sudo: Setting<Vec<String>>,
    /// Supplementary groups
    pub groups: Setting<Vec<String>>,
}

/// `users_and_groups`: flattened into the root
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct UsersAndGroups {
    /// Groups to create
    pub groups: Setting<Vec<String>>,
    pub user: Option<User>,
    pub users: Setting<Vec<User>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct SshConsole {
    /// Default: true
    pub emit_keys_to_console: Setting<bool>,
}

/// `keys_to_console`: flattened into the root
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct KeysToConsole {
    pub ssh: Option<SshConsole>,
    /// Key types whose host keys are not written to the console
    pub ssh_key_console_blacklist: Setting<Vec<String>>,
    /// Key types whose fingerprints are not written to the console
    pub ssh_fp_console_blacklist: Setting<Vec<String>>,
}
