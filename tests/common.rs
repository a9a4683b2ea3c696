//! Test utilities & fixtures.
//! A throwaway sled store plus an in-memory server, wired into a `CommandContext` per call.
#![allow(dead_code)]

use lifestealx::commands::{
    Actor, CommandContext, CommandOutcome, CommandRouter, Completion, Messages, PermissionTable,
};
use lifestealx::config::{Config, HeartsConfig};
use lifestealx::host::memory::InMemoryServer;
use lifestealx::host::{BridgeRegistry, ConfiguredItemRegistry, GameServer, IdentityBridge};
use lifestealx::storage::{PlayerStore, SledPlayerStore};
use lifestealx::types::{PlayerId, PlayerRecord};
use tempfile::TempDir;

pub struct Harness {
    pub dir: TempDir,
    pub store: SledPlayerStore,
    pub server: InMemoryServer,
    pub items: ConfiguredItemRegistry,
    pub permissions: PermissionTable,
    pub bridge: Option<BridgeRegistry>,
    pub hearts: HeartsConfig,
    pub messages: Messages,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_ceiling(max_hearts: i64) -> Self {
        let mut config = Config::default();
        config.hearts.enforce_max_hearts_on_admin_commands = true;
        config.hearts.max_hearts = max_hearts;
        Self::with_config(config)
    }

    pub fn with_config(config: Config) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SledPlayerStore::open(dir.path().join("data")).expect("store");
        Self {
            dir,
            store,
            server: InMemoryServer::new(env!("CARGO_PKG_VERSION")),
            items: ConfiguredItemRegistry::new(config.items.clone()),
            permissions: PermissionTable::from_config(&config.permissions),
            bridge: None,
            hearts: config.hearts.snapshot(),
            messages: Messages::new(&config.messages),
        }
    }

    /// Store a record for `name` and make the server know it; optionally connect it.
    pub fn add_player(&mut self, name: &str, hearts: u32, online: bool) -> PlayerId {
        let id = PlayerId::new_random();
        self.store
            .save(&PlayerRecord::new(id, name, hearts))
            .expect("save player");
        if online {
            self.server.connect(id, name, f64::from(hearts) * 2.0);
        } else {
            self.server.remember(id, Some(name));
        }
        id
    }

    pub fn player(&mut self, name: &str, grants: &[&str]) -> Actor {
        for grant in grants {
            self.permissions.grant(name, grant);
        }
        Actor::player(PlayerId::new_random(), name)
    }

    pub fn hearts_of(&self, id: &PlayerId) -> i64 {
        self.store.load(id).expect("load").expect("record").hearts()
    }

    pub fn max_health_of(&self, id: &PlayerId) -> f64 {
        self.store.load(id).expect("load").expect("record").max_health
    }

    pub fn run(&mut self, actor: &Actor, line: &str) -> CommandOutcome {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let mut ctx = CommandContext {
            store: &mut self.store,
            server: &mut self.server,
            items: &self.items,
            permissions: &self.permissions,
            bridge: self.bridge.as_ref().map(|b| b as &dyn IdentityBridge),
            hearts: self.hearts,
            messages: &self.messages,
        };
        CommandRouter::new().dispatch(&mut ctx, actor, &tokens)
    }

    /// Run against a different store (e.g. one that fails on save).
    pub fn run_with_store(
        &mut self,
        store: &mut dyn PlayerStore,
        actor: &Actor,
        line: &str,
    ) -> CommandOutcome {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let mut ctx = CommandContext {
            store,
            server: &mut self.server,
            items: &self.items,
            permissions: &self.permissions,
            bridge: self.bridge.as_ref().map(|b| b as &dyn IdentityBridge),
            hearts: self.hearts,
            messages: &self.messages,
        };
        CommandRouter::new().dispatch(&mut ctx, actor, &tokens)
    }

    /// Run against a different server (e.g. one whose reload fails).
    pub fn run_with_server(
        &mut self,
        server: &mut dyn GameServer,
        actor: &Actor,
        line: &str,
    ) -> CommandOutcome {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let mut ctx = CommandContext {
            store: &mut self.store,
            server,
            items: &self.items,
            permissions: &self.permissions,
            bridge: self.bridge.as_ref().map(|b| b as &dyn IdentityBridge),
            hearts: self.hearts,
            messages: &self.messages,
        };
        CommandRouter::new().dispatch(&mut ctx, actor, &tokens)
    }

    /// Complete `line`; a trailing space starts a new, empty token.
    pub fn complete(&mut self, actor: &Actor, line: &str) -> Completion {
        let tokens: Vec<&str> = line.split(' ').collect();
        let ctx = CommandContext {
            store: &mut self.store,
            server: &mut self.server,
            items: &self.items,
            permissions: &self.permissions,
            bridge: self.bridge.as_ref().map(|b| b as &dyn IdentityBridge),
            hearts: self.hearts,
            messages: &self.messages,
        };
        CommandRouter::new().complete(&ctx, actor, &tokens)
    }
}

pub fn options(list: &[&str]) -> Completion {
    Completion::Options(list.iter().map(|s| s.to_string()).collect())
}
