//! Contracts for everything the command engine needs from the surrounding game server.
//!
//! Handlers never reach for global state; a [`crate::commands::CommandContext`] hands
//! them one implementation of each trait per invocation.
//!
//! - [`PlayerDirectory`] - who is connected, and which names have ever joined
//! - [`LiveEntities`] - effects on connected players (max health, inventory, chat)
//! - [`PluginHost`] - version banner and reload hook
//! - [`IdentityBridge`] - alternate identity resolution for non-native clients
//! - [`ItemRegistry`] - custom item identifiers, craftability and item construction

pub mod memory;

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::config::ItemConfig;
use crate::types::PlayerId;

/// A player currently connected to the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnlinePlayer {
    pub id: PlayerId,
    pub name: String,
}

/// A player the server has seen before. `name` is `None` when the server only knows
/// the identity (the player never actually joined under that name).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnownPlayer {
    pub id: PlayerId,
    pub name: Option<String>,
}

/// An item ready to be placed in an inventory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemStack {
    pub item_id: String,
    pub display_name: String,
    pub amount: u32,
}

pub trait PlayerDirectory {
    /// Connected player with this exact name (case-insensitive).
    fn online_player(&self, name: &str) -> Option<OnlinePlayer>;
    /// Historical lookup by name, also covering offline players.
    fn offline_player(&self, name: &str) -> Option<KnownPlayer>;
    fn online_player_names(&self) -> Vec<String>;
}

pub trait LiveEntities {
    /// Apply a new maximum health to a connected player; no-op when `id` is offline.
    fn apply_max_health(&mut self, id: &PlayerId, max_health: f64);
    fn give_item(&mut self, id: &PlayerId, item: ItemStack);
    fn send_message(&mut self, id: &PlayerId, message: &str);
    fn show_recipe(&mut self, viewer: &PlayerId, recipe_id: &str);
}

pub trait PluginHost {
    fn version(&self) -> &str;
    fn reload(&mut self) -> anyhow::Result<()>;
}

/// Everything the server side provides in one object.
pub trait GameServer: PlayerDirectory + LiveEntities + PluginHost {}

impl<T: PlayerDirectory + LiveEntities + PluginHost> GameServer for T {}

pub trait IdentityBridge {
    fn is_known_non_native(&self, name: &str) -> bool;
    fn resolve_non_native(&self, name: &str) -> Option<PlayerId>;
}

pub trait ItemRegistry {
    /// Every known item identifier, sorted.
    fn item_ids(&self) -> BTreeSet<String>;
    fn is_craftable(&self, id: &str) -> bool;
    fn create_item(&self, id: &str, amount: u32) -> Option<ItemStack>;
    fn display_name(&self, id: &str) -> Option<String>;
}

/// Item registry backed by the `[items]` config section.
#[derive(Debug, Clone, Default)]
pub struct ConfiguredItemRegistry {
    items: BTreeMap<String, ItemConfig>,
}

impl ConfiguredItemRegistry {
    pub fn new(items: BTreeMap<String, ItemConfig>) -> Self {
        Self { items }
    }
}

impl ItemRegistry for ConfiguredItemRegistry {
    fn item_ids(&self) -> BTreeSet<String> {
        self.items.keys().cloned().collect()
    }

    fn is_craftable(&self, id: &str) -> bool {
        self.items.get(id).map(|item| item.craftable).unwrap_or(false)
    }

    fn create_item(&self, id: &str, amount: u32) -> Option<ItemStack> {
        self.items.get(id).map(|item| ItemStack {
            item_id: id.to_string(),
            display_name: item.name.clone(),
            amount,
        })
    }

    fn display_name(&self, id: &str) -> Option<String> {
        self.items.get(id).map(|item| item.name.clone())
    }
}

/// Identity bridge over the remembered non-native players (lowercase name to id).
#[derive(Debug, Clone, Default)]
pub struct BridgeRegistry {
    players: HashMap<String, PlayerId>,
}

impl BridgeRegistry {
    pub fn new(players: HashMap<String, PlayerId>) -> Self {
        let players = players
            .into_iter()
            .map(|(name, id)| (name.to_ascii_lowercase(), id))
            .collect();
        Self { players }
    }

    pub fn insert(&mut self, name: &str, id: PlayerId) {
        self.players.insert(name.to_ascii_lowercase(), id);
    }
}

impl IdentityBridge for BridgeRegistry {
    fn is_known_non_native(&self, name: &str) -> bool {
        self.players.contains_key(&name.to_ascii_lowercase())
    }

    fn resolve_non_native(&self, name: &str) -> Option<PlayerId> {
        self.players.get(&name.to_ascii_lowercase()).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_registry_exposes_items() {
        let mut items = BTreeMap::new();
        items.insert(
            "defaultheart".to_string(),
            ItemConfig {
                name: "&cHeart".to_string(),
                craftable: true,
            },
        );
        items.insert(
            "fragment".to_string(),
            ItemConfig {
                name: "Fragment".to_string(),
                craftable: false,
            },
        );
        let registry = ConfiguredItemRegistry::new(items);
        assert_eq!(
            registry.item_ids().into_iter().collect::<Vec<_>>(),
            vec!["defaultheart".to_string(), "fragment".to_string()]
        );
        assert!(registry.is_craftable("defaultheart"));
        assert!(!registry.is_craftable("fragment"));
        assert!(!registry.is_craftable("missing"));
        let stack = registry.create_item("defaultheart", 3).unwrap();
        assert_eq!(stack.amount, 3);
        assert_eq!(stack.display_name, "&cHeart");
        assert!(registry.create_item("missing", 1).is_none());
    }

    #[test]
    fn bridge_lookup_ignores_case() {
        let id = PlayerId::new_random();
        let mut bridge = BridgeRegistry::default();
        bridge.insert(".BedrockSteve", id);
        assert!(bridge.is_known_non_native(".bedrocksteve"));
        assert_eq!(bridge.resolve_non_native(".BEDROCKSTEVE"), Some(id));
        assert!(!bridge.is_known_non_native("Steve"));
    }
}
