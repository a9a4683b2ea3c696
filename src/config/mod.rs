//! # Configuration Management Module
//!
//! All runtime settings for the command engine live in one TOML file. Sections:
//!
//! - [`HeartsSettings`] - heart ceiling and whether admin commands respect it
//! - [`StorageConfig`] - where player data and CSV exports live
//! - [`LoggingConfig`] - log level and optional log files
//! - [`MessagesConfig`] - chat prefix and per-key message overrides
//! - [`ItemConfig`] - custom items that can be given and whose recipes can be viewed
//! - [`PermissionsConfig`] - which actors hold which permission strings
//! - [`BridgeConfig`] - cross-platform identity bridge toggle
//!
//! ## Usage
//!
//! ```rust,no_run
//! use lifestealx::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml").await?;
//!     println!("Max hearts: {}", config.hearts.max_hearts);
//!     Config::create_default("config.example.toml").await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration File Format
//!
//! ```toml
//! [hearts]
//! max_hearts = 20
//! enforce_max_hearts_on_admin_commands = false
//!
//! [storage]
//! data_dir = "./data"
//!
//! [items.defaultheart]
//! name = "&cHeart"
//! craftable = true
//!
//! [permissions.grants]
//! Moderator = ["lifestealx.help", "lifestealx.admin.setlife"]
//! ```
//!
//! Key names from the original YAML (`maxHearts`, `enforceMaxHeartsOnAdminCommands`)
//! are accepted as aliases.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tokio::fs;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub hearts: HeartsSettings,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub messages: MessagesConfig,
    /// Custom item definitions keyed by item identifier
    #[serde(default)]
    pub items: BTreeMap<String, ItemConfig>,
    #[serde(default)]
    pub permissions: PermissionsConfig,
    #[serde(default)]
    pub bridge: BridgeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeartsSettings {
    #[serde(default = "default_max_hearts", alias = "maxHearts")]
    pub max_hearts: i64,
    #[serde(default, alias = "enforceMaxHeartsOnAdminCommands")]
    pub enforce_max_hearts_on_admin_commands: bool,
    /// Hearts given to a freshly registered player
    #[serde(default = "default_hearts", alias = "defaultHearts")]
    pub default_hearts: u32,
}

fn default_max_hearts() -> i64 {
    20
}

fn default_hearts() -> u32 {
    10
}

impl Default for HeartsSettings {
    fn default() -> Self {
        Self {
            max_hearts: default_max_hearts(),
            enforce_max_hearts_on_admin_commands: false,
            default_hearts: default_hearts(),
        }
    }
}

impl HeartsSettings {
    /// The read-only values the heart mutator consults.
    pub fn snapshot(&self) -> HeartsConfig {
        HeartsConfig {
            enforce_max_hearts: self.enforce_max_hearts_on_admin_commands,
            max_hearts: self.max_hearts,
        }
    }
}

/// Configuration snapshot consulted while validating a heart mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeartsConfig {
    pub enforce_max_hearts: bool,
    pub max_hearts: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: "./data".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
    /// Admin actions (heart changes, data transfers) are also appended here
    #[serde(default)]
    pub security_file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: Some("lifestealx.log".to_string()),
            security_file: Some("lifestealx-admin.log".to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagesConfig {
    /// Prepended to messages sent with a prefix
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Message key (e.g. `messages.playerNotFound`) to template
    #[serde(default)]
    pub overrides: HashMap<String, String>,
}

fn default_prefix() -> String {
    "&8[&cLifeStealX&8] ".to_string()
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            overrides: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemConfig {
    /// Display name, may carry `&` colour codes
    pub name: String,
    #[serde(default = "default_craftable")]
    pub craftable: bool,
}

fn default_craftable() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionsConfig {
    /// The console holds every permission
    #[serde(default = "default_console_all")]
    pub console_all: bool,
    /// Actor name to granted permission strings (`*` and `prefix.*` allowed)
    #[serde(default)]
    pub grants: HashMap<String, Vec<String>>,
}

fn default_console_all() -> bool {
    true
}

impl Default for PermissionsConfig {
    fn default() -> Self {
        Self {
            console_all: true,
            grants: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BridgeConfig {
    /// Consult stored bridge identities when resolving player names
    #[serde(default)]
    pub enabled: bool,
}

impl Config {
    /// Load configuration from a file
    pub async fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path, e))?;

        Self::from_toml_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path, e))
    }

    /// Parse configuration from TOML text and check the values that handlers rely on.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.hearts.max_hearts < 1 || self.hearts.max_hearts > i64::from(i32::MAX) {
            return Err(anyhow!(
                "hearts.max_hearts must be between 1 and {} (got {})",
                i32::MAX,
                self.hearts.max_hearts
            ));
        }
        if self.hearts.default_hearts == 0 {
            return Err(anyhow!("hearts.default_hearts must be at least 1"));
        }
        if let Some(id) = self.items.keys().find(|id| id.trim().is_empty() || id.contains(' ')) {
            return Err(anyhow!("item identifier '{}' must be a single non-empty token", id));
        }
        Ok(())
    }

    /// Create a default configuration file
    pub async fn create_default(path: &str) -> Result<()> {
        let config = Config::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path, e))?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        let mut items = BTreeMap::new();
        items.insert(
            "defaultheart".to_string(),
            ItemConfig {
                name: "&cHeart".to_string(),
                craftable: true,
            },
        );
        items.insert(
            "revivecrystal".to_string(),
            ItemConfig {
                name: "&dRevive Crystal".to_string(),
                craftable: true,
            },
        );
        items.insert(
            "heartfragment".to_string(),
            ItemConfig {
                name: "&cHeart Fragment".to_string(),
                craftable: false,
            },
        );

        Config {
            hearts: HeartsSettings::default(),
            storage: StorageConfig::default(),
            logging: LoggingConfig::default(),
            messages: MessagesConfig::default(),
            items,
            permissions: PermissionsConfig::default(),
            bridge: BridgeConfig::default(),
        }
    }
}
