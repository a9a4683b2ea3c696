//! `/lifestealx hearts` through the router against a sled store.
mod common;

use std::path::PathBuf;

use common::Harness;
use lifestealx::commands::Actor;
use lifestealx::errors::StorageError;
use lifestealx::storage::{PlayerStore, SledPlayerStore};
use lifestealx::types::{PlayerId, PlayerRecord};

const HEARTS_USAGE: &str = "&cUsage: /lifestealx hearts <add | set | remove> <player> [amount]";
const BELOW_ZERO: &str = "&cYou cannot set the lives below or to zero";

#[test]
fn add_get_remove_scenario() {
    let mut h = Harness::new();
    let id = h.add_player("PlayerA", 10, false);

    let out = h.run(&Actor::Console, "hearts add PlayerA 5");
    assert!(out.handled);
    assert_eq!(h.max_health_of(&id), 30.0);
    assert!(out.replies[0].contains("add &cPlayerA' hearts to &715 hearts!"), "{:?}", out.replies);

    let out = h.run(&Actor::Console, "hearts get PlayerA");
    assert!(out.handled);
    assert!(out.replies[0].contains("&cPlayerA &7currently has &c15 &7hearts!"));

    let out = h.run(&Actor::Console, "hearts remove PlayerA 20");
    assert!(!out.handled);
    assert_eq!(out.replies, vec![BELOW_ZERO.to_string()]);

    let out = h.run(&Actor::Console, "hearts get PlayerA");
    assert!(out.replies[0].contains("&c15 &7hearts"));
    assert_eq!(h.hearts_of(&id), 15);
}

#[test]
fn set_then_get_returns_requested_amount() {
    let mut h = Harness::new();
    let id = h.add_player("Steve", 10, false);
    for amount in [1, 7, 10, 25, 300] {
        let out = h.run(&Actor::Console, &format!("hearts set Steve {}", amount));
        assert!(out.handled);
        assert!(out.replies[0].contains(&format!("to &7{} hearts!", amount)));
        assert_eq!(h.hearts_of(&id), amount);
        let out = h.run(&Actor::Console, "hearts get steve");
        assert!(out.replies[0].contains(&format!("&c{} &7hearts", amount)));
    }
}

#[test]
fn add_then_remove_restores_balance() {
    let mut h = Harness::new();
    let id = h.add_player("Alex", 4, false);
    for amount in [0, 1, 3, 50] {
        let before = h.hearts_of(&id);
        assert!(h.run(&Actor::Console, &format!("hearts add Alex {}", amount)).handled);
        assert!(h.run(&Actor::Console, &format!("hearts remove Alex {}", amount)).handled);
        assert_eq!(h.hearts_of(&id), before);
    }
}

#[test]
fn set_zero_is_rejected_without_mutation() {
    let mut h = Harness::new();
    let id = h.add_player("Alex", 6, false);
    let out = h.run(&Actor::Console, "hearts set Alex 0");
    assert!(!out.handled);
    assert_eq!(out.replies, vec![BELOW_ZERO.to_string()]);
    assert_eq!(h.hearts_of(&id), 6);
}

#[test]
fn remove_never_reaches_zero() {
    let mut h = Harness::new();
    let id = h.add_player("Alex", 3, false);
    for amount in [3, 4, 1000] {
        assert!(!h.run(&Actor::Console, &format!("hearts remove Alex {}", amount)).handled);
        assert_eq!(h.hearts_of(&id), 3);
    }
    assert!(h.run(&Actor::Console, "hearts remove Alex 2").handled);
    assert_eq!(h.hearts_of(&id), 1);
}

#[test]
fn ceiling_is_enforced_when_enabled() {
    let mut h = Harness::with_ceiling(10);
    let id = h.add_player("Alex", 5, false);

    let out = h.run(&Actor::Console, "hearts set Alex 11");
    assert!(!out.handled);
    assert!(out.replies[0].contains("You already reached the limit of 10 hearts!"));
    assert_eq!(h.hearts_of(&id), 5);

    assert!(h.run(&Actor::Console, "hearts set Alex 10").handled);
    assert_eq!(h.hearts_of(&id), 10);

    assert!(!h.run(&Actor::Console, "hearts add Alex 1").handled);
    assert_eq!(h.hearts_of(&id), 10);
}

#[test]
fn connected_player_receives_new_max_health() {
    let mut h = Harness::new();
    let online = h.add_player("Alex", 10, true);
    let offline = h.add_player("Steve", 10, false);

    assert!(h.run(&Actor::Console, "hearts add Alex 2").handled);
    assert_eq!(h.server.live_player(&online).unwrap().max_health, 24.0);

    assert!(h.run(&Actor::Console, "hearts set Steve 3").handled);
    assert!(h.server.live_player(&offline).is_none());
    assert_eq!(h.max_health_of(&offline), 6.0);
}

#[test]
fn get_is_idempotent() {
    let mut h = Harness::new();
    let id = h.add_player("Alex", 8, true);
    let first = h.run(&Actor::Console, "hearts get Alex");
    for _ in 0..3 {
        assert_eq!(h.run(&Actor::Console, "hearts get Alex"), first);
    }
    assert_eq!(h.hearts_of(&id), 8);
    assert_eq!(h.server.live_player(&id).unwrap().max_health, 16.0);
}

#[test]
fn usage_errors_list_exact_syntax() {
    let mut h = Harness::new();
    let id = h.add_player("Alex", 10, false);
    for line in [
        "hearts",
        "hearts add",
        "hearts double Alex 2",
        "hearts add Alex",
        "hearts set Alex -3",
    ] {
        let out = h.run(&Actor::Console, line);
        assert!(!out.handled, "{}", line);
        assert_eq!(out.replies, vec![HEARTS_USAGE.to_string()], "{}", line);
    }
    assert_eq!(h.hearts_of(&id), 10);
}

#[test]
fn malformed_amount_is_a_generic_failure() {
    let mut h = Harness::new();
    let id = h.add_player("Alex", 10, false);
    let out = h.run(&Actor::Console, "hearts add Alex lots");
    assert!(!out.handled);
    assert!(out.replies[0].contains("internal error"));
    assert_eq!(h.hearts_of(&id), 10);
}

#[test]
fn unknown_player_is_not_found() {
    let mut h = Harness::new();
    let out = h.run(&Actor::Console, "hearts get Herobrine");
    assert!(!out.handled);
    assert_eq!(out.replies, vec!["&cPlayer not found!".to_string()]);
}

#[test]
fn permission_is_required() {
    let mut h = Harness::new();
    let id = h.add_player("Alex", 10, false);
    let griefer = h.player("Griefer", &["lifestealx.help"]);
    let out = h.run(&griefer, "hearts set Alex 100");
    assert!(!out.handled);
    assert_eq!(
        out.replies,
        vec!["&cYou don't have permission to use this!".to_string()]
    );
    assert_eq!(h.hearts_of(&id), 10);

    let admin = h.player("Admin", &["lifestealx.admin.*"]);
    assert!(h.run(&admin, "hearts set Alex 12").handled);
    assert_eq!(h.hearts_of(&id), 12);
}

/// Loads from the real store but refuses every save.
struct ReadOnlyStore<'a> {
    inner: &'a SledPlayerStore,
}

impl PlayerStore for ReadOnlyStore<'_> {
    fn load(&self, id: &PlayerId) -> Result<Option<PlayerRecord>, StorageError> {
        self.inner.load(id)
    }

    fn save(&mut self, _record: &PlayerRecord) -> Result<(), StorageError> {
        Err(StorageError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            "disk full",
        )))
    }

    fn export(&self, stem: &str) -> Result<PathBuf, StorageError> {
        self.inner.export(stem)
    }

    fn import(&mut self, stem: &str) -> Result<usize, StorageError> {
        Err(StorageError::NotFound(stem.to_string()))
    }

    fn import_candidates(&self) -> Vec<String> {
        self.inner.import_candidates()
    }
}

#[test]
fn failed_save_leaves_connected_player_untouched() {
    let mut h = Harness::new();
    let id = h.add_player("Alex", 10, true);
    let mut copy = SledPlayerStore::open(h.dir.path().join("data-copy")).unwrap();
    copy.save(&h.store.load(&id).unwrap().unwrap()).unwrap();

    let mut failing = ReadOnlyStore { inner: &copy };
    let out = h.run_with_store(&mut failing, &Actor::Console, "hearts set Alex 5");
    assert!(!out.handled);
    assert!(out.replies[0].contains("Could not save player data"));
    assert_eq!(h.server.live_player(&id).unwrap().max_health, 20.0);
    assert_eq!(copy.load(&id).unwrap().unwrap().hearts(), 10);
}

#[test]
fn add_under_huge_ceiling_is_applied() {
    let mut h = Harness::with_ceiling(i64::MAX);
    let id = h.add_player("Alex", 10, false);
    let out = h.run(&Actor::Console, "hearts add Alex 1");
    assert!(out.handled, "{:?}", out.replies);
    assert_eq!(h.hearts_of(&id), 11);
}
