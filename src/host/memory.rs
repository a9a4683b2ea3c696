//! In-process [`GameServer`](super::GameServer) used by the operator CLI and the tests.
//!
//! Connected players are plain structs; "live" effects only touch those structs and
//! are recorded so callers can inspect what the command engine did.

use std::collections::HashMap;

use log::debug;

use super::{ItemStack, KnownPlayer, LiveEntities, OnlinePlayer, PlayerDirectory, PluginHost};
use crate::logutil::escape_log;
use crate::types::PlayerId;

/// State of one connected player.
#[derive(Debug, Clone, PartialEq)]
pub struct LivePlayer {
    pub id: PlayerId,
    pub name: String,
    pub max_health: f64,
    pub health: f64,
    pub inventory: Vec<ItemStack>,
    pub inbox: Vec<String>,
    pub open_recipe: Option<String>,
}

#[derive(Debug, Default)]
pub struct InMemoryServer {
    version: String,
    online: HashMap<PlayerId, LivePlayer>,
    known: HashMap<String, KnownPlayer>,
    reloads: u32,
}

impl InMemoryServer {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            ..Self::default()
        }
    }

    /// Connect a player with the given maximum health (half-heart units).
    pub fn connect(&mut self, id: PlayerId, name: &str, max_health: f64) {
        self.remember(id, Some(name));
        self.online.insert(
            id,
            LivePlayer {
                id,
                name: name.to_string(),
                max_health,
                health: max_health,
                inventory: Vec::new(),
                inbox: Vec::new(),
                open_recipe: None,
            },
        );
    }

    pub fn disconnect(&mut self, id: &PlayerId) -> Option<LivePlayer> {
        self.online.remove(id)
    }

    /// Record that a name has been seen on this server before.
    pub fn remember(&mut self, id: PlayerId, name: Option<&str>) {
        if let Some(name) = name {
            self.known.insert(
                name.to_ascii_lowercase(),
                KnownPlayer {
                    id,
                    name: Some(name.to_string()),
                },
            );
        }
    }

    /// Record an identity the server holds without a usable name.
    pub fn remember_nameless(&mut self, lookup_name: &str, id: PlayerId) {
        self.known
            .insert(lookup_name.to_ascii_lowercase(), KnownPlayer { id, name: None });
    }

    pub fn live_player(&self, id: &PlayerId) -> Option<&LivePlayer> {
        self.online.get(id)
    }

    pub fn reload_count(&self) -> u32 {
        self.reloads
    }
}

impl PlayerDirectory for InMemoryServer {
    fn online_player(&self, name: &str) -> Option<OnlinePlayer> {
        self.online
            .values()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .map(|p| OnlinePlayer {
                id: p.id,
                name: p.name.clone(),
            })
    }

    fn offline_player(&self, name: &str) -> Option<KnownPlayer> {
        self.known.get(&name.to_ascii_lowercase()).cloned()
    }

    fn online_player_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.online.values().map(|p| p.name.clone()).collect();
        names.sort();
        names
    }
}

impl LiveEntities for InMemoryServer {
    fn apply_max_health(&mut self, id: &PlayerId, max_health: f64) {
        if let Some(player) = self.online.get_mut(id) {
            player.max_health = max_health;
            if player.health > max_health {
                player.health = max_health;
            }
            debug!(
                "applied max health {} to {}",
                max_health,
                escape_log(&player.name)
            );
        }
    }

    fn give_item(&mut self, id: &PlayerId, item: ItemStack) {
        if let Some(player) = self.online.get_mut(id) {
            player.inventory.push(item);
        }
    }

    fn send_message(&mut self, id: &PlayerId, message: &str) {
        if let Some(player) = self.online.get_mut(id) {
            player.inbox.push(message.to_string());
        }
    }

    fn show_recipe(&mut self, viewer: &PlayerId, recipe_id: &str) {
        if let Some(player) = self.online.get_mut(viewer) {
            player.open_recipe = Some(recipe_id.to_string());
        }
    }
}

impl PluginHost for InMemoryServer {
    fn version(&self) -> &str {
        &self.version
    }

    fn reload(&mut self) -> anyhow::Result<()> {
        self.reloads += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_health_only_reaches_connected_players() {
        let mut server = InMemoryServer::new("1.0.0");
        let online = PlayerId::new_random();
        let offline = PlayerId::new_random();
        server.connect(online, "Alex", 20.0);
        server.remember(offline, Some("Steve"));

        server.apply_max_health(&online, 10.0);
        server.apply_max_health(&offline, 40.0);

        let live = server.live_player(&online).unwrap();
        assert_eq!(live.max_health, 10.0);
        assert_eq!(live.health, 10.0);
        assert!(server.live_player(&offline).is_none());
        assert_eq!(server.offline_player("steve").unwrap().id, offline);
    }

    #[test]
    fn directory_lists_online_names_sorted() {
        let mut server = InMemoryServer::new("1.0.0");
        server.connect(PlayerId::new_random(), "Zed", 20.0);
        server.connect(PlayerId::new_random(), "Amy", 20.0);
        assert_eq!(server.online_player_names(), vec!["Amy", "Zed"]);
        assert!(server.online_player("amy").is_some());
        assert!(server.online_player("Bob").is_none());
    }
}
