//! # Lifestealx - Admin Command Engine for a Life-Steal Game Mode
//!
//! Players' maximum health is counted in hearts (one heart = 2 health units). This crate
//! is the administrative side of that economy: the `/lifestealx` command tree that lets
//! operators inspect and adjust hearts, hand out custom items, view recipes and move
//! player data in and out of CSV files.
//!
//! ## Features
//!
//! - **Heart economy**: `hearts add | set | remove | get` with a configurable ceiling
//!   and a hard floor of one heart.
//! - **Ordered side effects**: every mutation is persisted before it reaches a connected player.
//! - **Permission gating**: one permission string per subcommand, checked on every invocation.
//! - **Tab completion**: suggestions that mirror the routing table and the actor's permissions.
//! - **Player data transfer**: CSV export/import through a sled-backed store.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lifestealx::commands::{Actor, CommandContext, CommandRouter, Messages, PermissionTable};
//! use lifestealx::config::Config;
//! use lifestealx::host::memory::InMemoryServer;
//! use lifestealx::host::ConfiguredItemRegistry;
//! use lifestealx::storage::SledPlayerStore;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml").await?;
//!     let mut store = SledPlayerStore::open(&config.storage.data_dir)?;
//!     let mut server = InMemoryServer::new(env!("CARGO_PKG_VERSION"));
//!     let items = ConfiguredItemRegistry::new(config.items.clone());
//!     let permissions = PermissionTable::from_config(&config.permissions);
//!     let messages = Messages::new(&config.messages);
//!     let mut ctx = CommandContext {
//!         store: &mut store,
//!         server: &mut server,
//!         items: &items,
//!         permissions: &permissions,
//!         bridge: None,
//!         hearts: config.hearts.snapshot(),
//!         messages: &messages,
//!     };
//!     let outcome =
//!         CommandRouter::new().dispatch(&mut ctx, &Actor::Console, &["hearts", "get", "Steve"]);
//!     for line in outcome.replies {
//!         println!("{}", line);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`commands`] - router, handlers, permissions, completion and chat messages
//! - [`host`] - traits for the surrounding game server, plus an in-memory implementation
//! - [`storage`] - player record persistence and CSV transfer
//! - [`config`] - TOML configuration
//! - [`types`] - player identity and record
//! - [`errors`] - storage error type
//! - [`logutil`] - helpers for logging untrusted input

pub mod commands;
pub mod config;
pub mod errors;
pub mod host;
pub mod logutil;
pub mod storage;
pub mod types;
