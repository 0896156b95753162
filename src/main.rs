//! Binary entrypoint for the Monster Catcher admin CLI.
//!
//! Commands:
//! - `init` - create a starter `config.toml`
//! - `seed [--file <json>]` - load the starter world or a JSON world seed
//! - `status` - print record counts
//! - `create-user <username>` - register a user
//! - `create-character <username> <name> [--at <region:node>]` - create a character
//! - `locate <character-id>` - show the node a character stands on
//! - `move <character-id> <region:node|none>` - move a character or clear its location
//!
//! See the library crate docs for module-level details: `monster_catcher::`.
use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use log::{info, warn};
use uuid::Uuid;

use monster_catcher::config::Config;
use monster_catcher::world::{
    load_world_from_json, CharacterRecord, GameStore, GameStoreBuilder, LocationKey,
    LocationResolver, NodeRecord, UserRecord,
};

#[derive(Parser)]
#[command(name = "monster-catcher")]
#[command(about = "Administer Monster Catcher characters and the exploration world")]
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
    /// Write a default configuration file
    Init,
    /// Load regions and nodes into the database
    Seed {
        /// JSON world seed; the built-in starter world is used when omitted
        #[arg(short, long)]
        file: Option<String>,
    },
    /// Show record counts
    Status,
    /// Register a new user
    CreateUser { username: String },
    /// Create a character owned by an existing user
    CreateCharacter {
        username: String,
        name: String,
        /// Starting location (`region:node`); defaults to the configured starting location
        #[arg(long)]
        at: Option<String>,
    },
    /// Show a character's current node
    Locate { character: Uuid },
    /// Move a character to a node, or `none` to clear its location
    Move { character: Uuid, location: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Init = cli.command {
        init_logging(&None, cli.verbose);
        info!("Initializing new configuration");
        Config::create_default(&cli.config).await?;
        info!("Configuration file created at {}", cli.config);
        return Ok(());
    }

    let config = match Config::load(&cli.config).await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} (using defaults)", e);
            Config::default()
        }
    };
    init_logging(&Some(config.clone()), cli.verbose);

    let db_path = config.storage.database_path();
    let mut builder = GameStoreBuilder::new(&db_path);
    if !config.storage.seed_world {
        builder = builder.without_world_seed();
    }
    let store = builder.open()?;
    info!("Opened {} database at {}", config.game.name, db_path.display());

    match cli.command {
        Commands::Init => unreachable!("handled above"),
        Commands::Seed { file } => {
            let inserted = match file {
                Some(path) => {
                    let (regions, nodes) = load_world_from_json(&path)?;
                    let count = store.load_world(regions, nodes)?;
                    info!("Loaded {} records from {}", count, path);
                    count
                }
                None => store.seed_world_if_needed()?,
            };
            println!("Seeded {} records.", inserted);
        }
        Commands::Status => {
            let summary = store.summary()?;
            println!("{}", config.game.name);
            println!("  regions:    {}", summary.regions);
            println!("  nodes:      {}", summary.nodes);
            println!("  users:      {}", summary.users);
            println!("  characters: {}", summary.characters);
        }
        Commands::CreateUser { username } => {
            let user = UserRecord::new(username.trim());
            store.put_user(user.clone())?;
            println!("Created user {} ({})", user.username, user.id);
        }
        Commands::CreateCharacter { username, name, at } => {
            let user = store
                .find_user_by_username(&username)?
                .ok_or_else(|| anyhow!("unknown user '{}'", username))?;
            let mut character = CharacterRecord::for_user(name.trim(), &user);
            let start = match at {
                Some(raw) => Some(raw.parse::<LocationKey>()?),
                None => config.starting_location(),
            };
            if let Some(key) = start {
                let node = require_node(&store, &key)?;
                character.set_current_node(Some(&node));
            }
            let character = store.create_character(character)?;
            println!(
                "Created character {} ({}) at {}",
                character.name,
                character.id,
                character.node_key().unwrap_or("nowhere")
            );
        }
        Commands::Locate { character } => {
            let character = store.get_character(&character)?;
            match character.current_node(&store)? {
                Some(node) => println!(
                    "{} is at {} ({}:{})",
                    character.name, node.name, node.region_key, node.key
                ),
                None => {
                    if let Some(raw) = character.node_key() {
                        warn!("{} has unresolvable location key '{}'", character.id, raw);
                    }
                    println!("{} is nowhere", character.name);
                }
            }
        }
        Commands::Move {
            character,
            location,
        } => {
            let mut character = store.get_character(&character)?;
            if location.eq_ignore_ascii_case("none") {
                character.set_current_node(None);
            } else {
                let key: LocationKey = location.parse()?;
                let node = require_node(&store, &key)?;
                character.set_current_node(Some(&node));
            }
            store.put_character(character.clone())?;
            println!(
                "{} moved to {}",
                character.name,
                character.node_key().unwrap_or("nowhere")
            );
        }
    }

    Ok(())
}

fn require_node(store: &GameStore, key: &LocationKey) -> Result<NodeRecord> {
    LocationResolver::new(store)
        .resolve_node(key)?
        .ok_or_else(|| anyhow!("no node at {}", key))
}

fn init_logging(config: &Option<Config>, verbosity: u8) {
    use std::io::Write;
    let mut builder = env_logger::Builder::new();
    // CLI verbosity overrides the configured level
    let base_level = match verbosity {
        0 => config
            .as_ref()
            .map(|c| c.logging.level_filter())
            .unwrap_or(log::LevelFilter::Info),
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);

    let log_file = config
        .as_ref()
        .and_then(|c| c.logging.file.as_ref())
        .and_then(|file| {
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(file)
                .ok()
        });

    if let Some(f) = log_file {
        let write_mutex = std::sync::Arc::new(std::sync::Mutex::new(f));
        // Mirror to the console only when attached to a terminal
        let is_tty = atty::is(atty::Stream::Stdout);
        builder.format(move |fmt, record| {
            let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
            let line = format!("{} [{}] {}", ts, record.level(), record.args());
            if let Ok(mut guard) = write_mutex.lock() {
                let _ = writeln!(guard, "{}", line);
            }
            if is_tty {
                writeln!(fmt, "{}", line)
            } else {
                Ok(())
            }
        });
    } else {
        builder.format(|fmt, record| {
            writeln!(
                fmt,
                "{} [{}] {}",
                chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ"),
                record.level(),
                record.args()
            )
        });
    }
    let _ = builder.try_init();
}
