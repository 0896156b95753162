//! # Configuration Management Module
//!
//! Loads and writes the TOML configuration used by the `monster-catcher` binary.
//!
//! ## Configuration Structure
//!
//! - [`GameConfig`] - game name and the location new characters start at
//! - [`StorageConfig`] - data directory and sled database path
//! - [`LoggingConfig`] - log level and optional log file
//!
//! ## Usage
//!
//! ```rust,no_run
//! use monster_catcher::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml").await?;
//!     println!("Game: {}", config.game.name);
//!     println!("Database: {}", config.storage.database_path().display());
//!
//!     Config::create_default("config.toml").await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration File Format
//!
//! ```toml
//! [game]
//! name = "Monster Catcher"
//! starting_location = "town:square"
//!
//! [storage]
//! data_dir = "./data"
//! seed_world = true
//!
//! [logging]
//! level = "info"
//! file = "monster-catcher.log"
//! ```

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::world::{LocationKey, DEFAULT_START_LOCATION};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    pub name: String,
    /// Location key (`"<region>:<node>"`) given to newly created characters.
    /// When unset, characters start with no location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starting_location: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: String,
    /// Optional override for the sled database path; defaults to `<data_dir>/world`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_path: Option<String>,
    /// Insert the starter world when the database has no regions.
    #[serde(default = "default_seed_world")]
    pub seed_world: bool,
}

fn default_seed_world() -> bool {
    true
}

impl StorageConfig {
    pub fn database_path(&self) -> PathBuf {
        match &self.db_path {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from(&self.data_dir).join("world"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
}

impl LoggingConfig {
    /// Parsed level filter; unknown names fall back to `Info`.
    pub fn level_filter(&self) -> log::LevelFilter {
        self.level.parse().unwrap_or(log::LevelFilter::Info)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub game: GameConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a file
    pub async fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path, e))?;

        let config = Self::from_toml(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path, e))?;

        Ok(config)
    }

    /// Parse and validate configuration text.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
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

    pub fn validate(&self) -> Result<()> {
        if self.game.name.trim().is_empty() {
            return Err(anyhow!("game.name must not be empty"));
        }
        if let Some(raw) = &self.game.starting_location {
            raw.parse::<LocationKey>()
                .map_err(|e| anyhow!("game.starting_location: {}", e))?;
        }
        Ok(())
    }

    /// Starting location as a key, if configured.
    pub fn starting_location(&self) -> Option<LocationKey> {
        self.game
            .starting_location
            .as_deref()
            .and_then(|raw| raw.parse().ok())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            game: GameConfig {
                name: "Monster Catcher".to_string(),
                starting_location: Some(DEFAULT_START_LOCATION.to_string()),
            },
            storage: StorageConfig {
                data_dir: "./data".to_string(),
                db_path: None,
                seed_world: true,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file: Some("monster-catcher.log".to_string()),
            },
        }
    }
}
