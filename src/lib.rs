//! # Monster Catcher - character and exploration backend
//!
//! Persistence and location tracking for the characters of the Monster Catcher game.
//!
//! ## Features
//!
//! - **Characters**: named, user-owned records with field-level validation.
//! - **Exploration graph**: regions and nodes stored in sled, with a built-in starter
//!   world and a JSON seed loader for custom worlds.
//! - **Location keys**: a character's position is stored as `"<region>:<node>"` and
//!   resolved back to a node through an injectable [`world::NodeDirectory`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use monster_catcher::world::{CharacterRecord, GameStore, UserRecord};
//!
//! fn main() -> anyhow::Result<()> {
//!     let store = GameStore::open("data/world")?;
//!     let user = UserRecord::new("misty");
//!     store.put_user(user.clone())?;
//!
//!     let mut character = CharacterRecord::for_user("Ash", &user);
//!     let clearing = store.get_node("forest", "clearing")?;
//!     character.set_current_node(Some(&clearing));
//!     store.put_character(character.clone())?;
//!
//!     assert_eq!(character.current_node(&store)?, Some(clearing));
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`world`] - records, sled storage, location keys and world seeding
//! - [`config`] - TOML configuration for the command-line tool
//! - [`validation`] - field and key validation rules

pub mod config;
pub mod validation;
pub mod world;
