//! Characters, users and the exploration graph they move through.
//!
//! Records are persisted in sled via [`GameStore`]; a character's position is
//! stored as a composite `"<region>:<node>"` key and resolved back to a node
//! through the [`NodeDirectory`] capability.

pub mod character;
pub mod errors;
pub mod location;
pub mod seed_loader;
pub mod state;
pub mod storage;
pub mod types;

pub use character::CharacterRecord;
pub use errors::GameError;
pub use location::{decode, encode, LocationKey, LocationResolver, MalformedKey, NodeDirectory};
pub use seed_loader::{load_world_from_json, parse_world_seed};
pub use state::{canonical_world_seed, DEFAULT_START_LOCATION, STARTER_NODE_KEYS, STARTER_REGION_KEYS};
pub use storage::{GameStore, GameStoreBuilder, StoreSummary};
pub use types::*;
