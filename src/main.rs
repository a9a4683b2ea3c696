//! Binary entrypoint for the Lifestealx operator CLI.
//!
//! Commands:
//! - `init` - write a starter `config.toml` and create the data directory
//! - `exec [--as <name>] <tokens...>` - run one `/lifestealx` invocation against the stored data
//! - `complete [--as <name>] <tokens...>` - print tab-completion suggestions
//! - `register <name> [--hearts N] [--bridge]` - create a player record
//! - `status` - print a JSON summary of the store and heart settings
//!
//! The CLI has no connected players, so heart changes only reach the stored records.
//! See the library crate docs for module-level details: `lifestealx::`.
use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use log::info;

use lifestealx::commands::messages::strip_formatting;
use lifestealx::commands::{
    Actor, CommandContext, CommandRouter, Completion, Messages, PermissionTable,
};
use lifestealx::config::Config;
use lifestealx::host::memory::InMemoryServer;
use lifestealx::host::{BridgeRegistry, ConfiguredItemRegistry, IdentityBridge, PlayerDirectory};
use lifestealx::storage::{PlayerStore, SledPlayerStore};
use lifestealx::types::{PlayerId, PlayerRecord};

#[derive(Parser)]
#[command(name = "lifestealx")]
#[command(about = "Admin commands for the life-steal heart economy")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration and create the data directory
    Init,
    /// Run one command invocation, e.g. `exec hearts add Steve 2`
    Exec {
        /// Issue the command as this player instead of the console
        #[arg(long = "as")]
        actor: Option<String>,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        tokens: Vec<String>,
    },
    /// Print completion suggestions for a partially typed invocation
    Complete {
        /// Complete as this player instead of the console
        #[arg(long = "as")]
        actor: Option<String>,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        tokens: Vec<String>,
    },
    /// Create a stored player record
    Register {
        name: String,
        /// Starting hearts (defaults to hearts.default_hearts)
        #[arg(long)]
        hearts: Option<u32>,
        /// Remember the player as a bridged (non-native) client
        #[arg(long)]
        bridge: bool,
    },
    /// Show stored player count and heart settings
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init => {
            init_logging(&None, cli.verbose);
            Config::create_default(&cli.config).await?;
            let config = Config::load(&cli.config).await?;
            tokio::fs::create_dir_all(&config.storage.data_dir).await?;
            info!(
                "Configuration file created at {}, data directory {}",
                cli.config, config.storage.data_dir
            );
        }
        Commands::Exec { actor, tokens } => {
            let (config, mut store) = open(&cli.config, cli.verbose).await?;
            let actor = resolve_actor(&store, actor.as_deref())?;
            let handled = {
                let mut session = Session::new(&config, &store)?;
                let mut ctx = session.context(&config, &mut store);
                let outcome = CommandRouter::new().dispatch(&mut ctx, &actor, &tokens);
                for reply in &outcome.replies {
                    println!("{}", strip_formatting(reply));
                }
                outcome.handled
            };
            drop(store);
            if !handled {
                std::process::exit(1);
            }
        }
        Commands::Complete { actor, tokens } => {
            let (config, mut store) = open(&cli.config, cli.verbose).await?;
            let actor = resolve_actor(&store, actor.as_deref())?;
            let mut session = Session::new(&config, &store)?;
            let online = session.server.online_player_names();
            let ctx = session.context(&config, &mut store);
            match CommandRouter::new().complete(&ctx, &actor, &tokens) {
                Completion::PlayerNames if online.is_empty() => println!("<online players>"),
                completion => {
                    let typed = tokens.last().map(String::as_str).unwrap_or("");
                    for suggestion in completion.into_suggestions(online, typed) {
                        println!("{}", suggestion);
                    }
                }
            }
        }
        Commands::Register {
            name,
            hearts,
            bridge,
        } => {
            let (config, mut store) = open(&cli.config, cli.verbose).await?;
            if let Some(existing) = store.find_id_by_name(&name)? {
                return Err(anyhow!("{} is already registered as {}", name, existing));
            }
            let hearts = hearts.unwrap_or(config.hearts.default_hearts);
            if hearts == 0 {
                return Err(anyhow!("a player needs at least one heart"));
            }
            let record = PlayerRecord::new(PlayerId::new_random(), name.as_str(), hearts);
            store.save(&record)?;
            if bridge {
                store.register_bridge_player(&name, record.uuid)?;
            }
            info!("Registered {} ({}) with {} hearts", name, record.uuid, hearts);
            println!("{}", record.uuid);
        }
        Commands::Status => {
            let (config, store) = open(&cli.config, cli.verbose).await?;
            let payload = serde_json::json!({
                "version": env!("CARGO_PKG_VERSION"),
                "players": store.player_count(),
                "bridged_players": store.bridge_players()?.len(),
                "max_hearts": config.hearts.max_hearts,
                "enforce_max_hearts_on_admin_commands":
                    config.hearts.enforce_max_hearts_on_admin_commands,
                "data_dir": config.storage.data_dir,
                "import_candidates": store.import_candidates(),
            });
            println!("{}", payload);
        }
    }

    Ok(())
}

/// Load the config, start logging and open the player store.
async fn open(config_path: &str, verbosity: u8) -> Result<(Config, SledPlayerStore)> {
    let config = Config::load(config_path).await?;
    init_logging(&Some(config.clone()), verbosity);
    let store = SledPlayerStore::open(&config.storage.data_dir)?;
    Ok((config, store))
}

/// Host-side state for one CLI invocation.
struct Session {
    server: InMemoryServer,
    items: ConfiguredItemRegistry,
    permissions: PermissionTable,
    bridge: Option<BridgeRegistry>,
    messages: Messages,
}

impl Session {
    fn new(config: &Config, store: &SledPlayerStore) -> Result<Self> {
        let mut server = InMemoryServer::new(env!("CARGO_PKG_VERSION"));
        for record in store.list_players()? {
            server.remember(record.uuid, Some(&record.name));
        }
        let bridge = if config.bridge.enabled {
            Some(BridgeRegistry::new(store.bridge_players()?))
        } else {
            None
        };
        Ok(Self {
            server,
            items: ConfiguredItemRegistry::new(config.items.clone()),
            permissions: PermissionTable::from_config(&config.permissions),
            bridge,
            messages: Messages::new(&config.messages),
        })
    }

    fn context<'a>(
        &'a mut self,
        config: &Config,
        store: &'a mut SledPlayerStore,
    ) -> CommandContext<'a> {
        CommandContext {
            store,
            server: &mut self.server,
            items: &self.items,
            permissions: &self.permissions,
            bridge: self.bridge.as_ref().map(|b| b as &dyn IdentityBridge),
            hearts: config.hearts.snapshot(),
            messages: &self.messages,
        }
    }
}

/// `--as <name>` picks a stored player; without it the console issues the command.
fn resolve_actor(store: &SledPlayerStore, name: Option<&str>) -> Result<Actor> {
    match name {
        None => Ok(Actor::Console),
        Some(name) if name.eq_ignore_ascii_case("console") => Ok(Actor::Console),
        Some(name) => {
            let id = store
                .find_id_by_name(name)?
                .unwrap_or_else(PlayerId::new_random);
            Ok(Actor::player(id, name))
        }
    }
}

fn init_logging(config: &Option<Config>, verbosity: u8) {
    use std::io::Write;
    let mut builder = env_logger::Builder::new();
    // CLI verbosity overrides the configured level
    let configured = config
        .as_ref()
        .and_then(|cfg| cfg.logging.level.parse::<log::LevelFilter>().ok())
        .unwrap_or(log::LevelFilter::Info);
    let base_level = match verbosity {
        0 => configured,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);

    let file = config.as_ref().and_then(|cfg| {
        cfg.logging.file.as_ref().and_then(|path| {
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .ok()
        })
    });
    let security_path = config
        .as_ref()
        .and_then(|cfg| cfg.logging.security_file.clone());

    match file {
        Some(f) => {
            let write_mutex = std::sync::Arc::new(std::sync::Mutex::new(f));
            let is_tty = atty::is(atty::Stream::Stdout);
            builder.format(move |fmt, record| {
                let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
                let line = format!("{} [{}] {}", ts, record.level(), record.args());

                if let Ok(mut guard) = write_mutex.lock() {
                    let _ = writeln!(guard, "{}", line);
                }
                if record.target() == "security" {
                    if let Some(ref sec_path) = security_path {
                        if let Ok(mut sf) = std::fs::OpenOptions::new()
                            .create(true)
                            .append(true)
                            .open(sec_path)
                        {
                            let _ = writeln!(sf, "{}", line);
                        }
                    }
                }
                if is_tty {
                    writeln!(fmt, "{}", line)
                } else {
                    Ok(())
                }
            });
        }
        None => {
            builder.format(move |fmt, record| {
                let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
                let line = format!("{} [{}] {}", ts, record.level(), record.args());
                if record.target() == "security" {
                    if let Some(ref sec_path) = security_path {
                        if let Ok(mut sf) = std::fs::OpenOptions::new()
                            .create(true)
                            .append(true)
                            .open(sec_path)
                        {
                            let _ = writeln!(sf, "{}", line);
                        }
                    }
                }
                writeln!(fmt, "{}", line)
            });
        }
    }
    let _ = builder.try_init();
}
