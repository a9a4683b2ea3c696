//! Config file values flowing into command behaviour.
mod common;

use common::Harness;
use lifestealx::commands::Actor;
use lifestealx::config::Config;

const CONFIG: &str = r#"
[hearts]
maxHearts = 12
enforceMaxHeartsOnAdminCommands = true

[messages]
prefix = "[LS] "

[messages.overrides]
"messages.playerNotFound" = "&cNo such player: %player%"

[items.goldenheart]
name = "&6Golden Heart"
craftable = false

[permissions]
console_all = true

[permissions.grants]
Moderator = ["lifestealx.help", "lifestealx.admin.setlife"]
"#;

#[tokio::test]
async fn file_settings_drive_commands() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    tokio::fs::write(&path, CONFIG).await.unwrap();
    let config = Config::load(path.to_str().unwrap()).await.unwrap();
    assert_eq!(config.hearts.max_hearts, 12);
    assert!(config.items.contains_key("goldenheart"));

    let mut h = Harness::with_config(config);
    let id = h.add_player("Alex", 10, false);
    let moderator = Actor::player(lifestealx::types::PlayerId::new_random(), "moderator");

    let out = h.run(&moderator, "hearts set Alex 13");
    assert!(!out.handled);
    assert_eq!(out.replies, vec!["[LS] &cYou already reached the limit of 12 hearts!".to_string()]);

    let out = h.run(&moderator, "hearts add Alex 2");
    assert!(out.handled);
    assert!(out.replies[0].starts_with("[LS] "));
    assert_eq!(h.hearts_of(&id), 12);

    let out = h.run(&moderator, "hearts get Bob");
    assert_eq!(out.replies, vec!["&cNo such player: Bob".to_string()]);

    assert!(!h.run(&moderator, "data export x").handled);
}

#[tokio::test]
async fn default_config_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    let path = path.to_str().unwrap();
    Config::create_default(path).await.unwrap();
    let config = Config::load(path).await.unwrap();
    assert_eq!(config.hearts.max_hearts, 20);
    assert!(!config.hearts.enforce_max_hearts_on_admin_commands);
    assert_eq!(config.items.len(), 3);
}
