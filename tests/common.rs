//! Test fixtures: throwaway stores and factories with unique sequences.
#![allow(dead_code)] // Each test binary uses a different subset of these helpers.

use std::sync::atomic::{AtomicUsize, Ordering};

use monster_catcher::world::{
    CharacterRecord, GameStore, GameStoreBuilder, NodeRecord, RegionRecord, UserRecord,
};
use tempfile::TempDir;

static SEQUENCE: AtomicUsize = AtomicUsize::new(0);

fn next() -> usize {
    SEQUENCE.fetch_add(1, Ordering::Relaxed)
}

pub fn character_name() -> String {
    format!("Trainer {}", next())
}

pub fn username() -> String {
    format!("player{}", next())
}

pub fn region_key() -> String {
    format!("region_{}", next())
}

pub fn node_key() -> String {
    format!("node_{}", next())
}

/// Empty store (no starter world) kept alive by the returned `TempDir`.
pub fn empty_store() -> (GameStore, TempDir) {
    let temp_dir = TempDir::new().expect("tempdir");
    let store = GameStoreBuilder::new(temp_dir.path())
        .without_world_seed()
        .open()
        .expect("store");
    (store, temp_dir)
}

/// Store seeded with the starter world.
pub fn seeded_store() -> (GameStore, TempDir) {
    let temp_dir = TempDir::new().expect("tempdir");
    let store = GameStoreBuilder::new(temp_dir.path()).open().expect("store");
    (store, temp_dir)
}

pub fn create_user(store: &GameStore) -> UserRecord {
    let user = UserRecord::new(&username());
    store.put_user(user.clone()).expect("put user");
    user
}

/// A fresh region with one node, both stored.
pub fn create_node(store: &GameStore) -> NodeRecord {
    let region = RegionRecord::new(&region_key(), "Generated Region");
    store.put_region(region.clone()).expect("put region");
    let node = NodeRecord::new(&region.key, &node_key(), "Generated Node");
    store.put_node(node.clone()).expect("put node");
    store.get_node(&node.region_key, &node.key).expect("stored node")
}

/// Valid, unsaved character attributes for `user`.
pub fn character_for(user: &UserRecord) -> CharacterRecord {
    CharacterRecord::for_user(&character_name(), user)
}
