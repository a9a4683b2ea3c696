//! Actors and the permission strings that gate each subcommand.
//!
//! Permission checks are never cached; every handler asks the [`PermissionGate`]
//! again when it runs.

use std::collections::HashMap;

use crate::config::PermissionsConfig;
use crate::types::PlayerId;

/// Who issued a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Actor {
    Console,
    Player { id: PlayerId, name: String },
}

impl Actor {
    pub fn player(id: PlayerId, name: impl Into<String>) -> Self {
        Actor::Player {
            id,
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Actor::Console => "CONSOLE",
            Actor::Player { name, .. } => name,
        }
    }

    pub fn player_id(&self) -> Option<&PlayerId> {
        match self {
            Actor::Console => None,
            Actor::Player { id, .. } => Some(id),
        }
    }
}

/// Every permission string the command engine consults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    Reload,
    Help,
    ViewRecipes,
    SetLife,
    GiveItem,
    ManageData,
    // Only listed on the help page; the commands live elsewhere.
    Revive,
    Eliminate,
    Withdraw,
}

impl Permission {
    pub fn as_str(self) -> &'static str {
        match self {
            Permission::Reload => "lifestealx.admin.reload",
            Permission::Help => "lifestealx.help",
            Permission::ViewRecipes => "lifestealx.viewrecipes",
            Permission::SetLife => "lifestealx.admin.setlife",
            Permission::GiveItem => "lifestealx.admin.giveitem",
            Permission::ManageData => "lifestealx.managedata",
            Permission::Revive => "lifestealx.admin.revive",
            Permission::Eliminate => "lifestealx.admin.eliminate",
            Permission::Withdraw => "lifestealx.withdraw",
        }
    }
}

pub trait PermissionGate {
    fn has_permission(&self, actor: &Actor, permission: Permission) -> bool;
}

/// Permission grants loaded from the `[permissions]` config section.
#[derive(Debug, Clone, Default)]
pub struct PermissionTable {
    console_all: bool,
    grants: HashMap<String, Vec<String>>,
}

impl PermissionTable {
    pub fn from_config(config: &PermissionsConfig) -> Self {
        let grants = config
            .grants
            .iter()
            .map(|(actor, perms)| (actor.to_ascii_lowercase(), perms.clone()))
            .collect();
        Self {
            console_all: config.console_all,
            grants,
        }
    }

    pub fn grant(&mut self, actor: &str, permission: &str) {
        self.grants
            .entry(actor.to_ascii_lowercase())
            .or_default()
            .push(permission.to_string());
    }

    fn grant_matches(granted: &str, wanted: &str) -> bool {
        if granted == "*" || granted == wanted {
            return true;
        }
        match granted.strip_suffix(".*") {
            Some(prefix) => wanted
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.starts_with('.')),
            None => false,
        }
    }
}

impl PermissionGate for PermissionTable {
    fn has_permission(&self, actor: &Actor, permission: Permission) -> bool {
        if matches!(actor, Actor::Console) && self.console_all {
            return true;
        }
        let wanted = permission.as_str();
        self.grants
            .get(&actor.name().to_ascii_lowercase())
            .is_some_and(|granted| granted.iter().any(|g| Self::grant_matches(g, wanted)))
    }
}
