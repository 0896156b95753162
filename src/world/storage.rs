use std::path::{Path, PathBuf};

use chrono::Utc;
use log::{debug, info};
use sled::IVec;
use uuid::Uuid;

use crate::validation::{validate_key, ValidationErrors, BLANK_MESSAGE};
use crate::world::character::CharacterRecord;
use crate::world::errors::GameError;
use crate::world::location::NodeDirectory;
use crate::world::state::canonical_world_seed;
use crate::world::types::{
    NodeRecord, RegionRecord, UserRecord, CHARACTER_SCHEMA_VERSION, NODE_SCHEMA_VERSION,
    REGION_SCHEMA_VERSION, USER_SCHEMA_VERSION,
};

const TREE_WORLD: &str = "world";
const TREE_ACTORS: &str = "actors";

/// Records carrying a schema version that is checked on every read.
trait Versioned {
    const ENTITY: &'static str;
    const VERSION: u8;
    fn schema_version(&self) -> u8;
}

impl Versioned for UserRecord {
    const ENTITY: &'static str = "user";
    const VERSION: u8 = USER_SCHEMA_VERSION;
    fn schema_version(&self) -> u8 {
        self.schema_version
    }
}

impl Versioned for RegionRecord {
    const ENTITY: &'static str = "region";
    const VERSION: u8 = REGION_SCHEMA_VERSION;
    fn schema_version(&self) -> u8 {
        self.schema_version
    }
}

impl Versioned for NodeRecord {
    const ENTITY: &'static str = "node";
    const VERSION: u8 = NODE_SCHEMA_VERSION;
    fn schema_version(&self) -> u8 {
        self.schema_version
    }
}

impl Versioned for CharacterRecord {
    const ENTITY: &'static str = "character";
    const VERSION: u8 = CHARACTER_SCHEMA_VERSION;
    fn schema_version(&self) -> u8 {
        self.schema_version
    }
}

/// Helper builder so tests can easily create throwaway stores with custom paths.
pub struct GameStoreBuilder {
    path: PathBuf,
    ensure_world_seed: bool,
}

impl GameStoreBuilder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ensure_world_seed: true,
        }
    }

    /// Opt out of seeding the starter world during initialization (useful for targeted tests).
    pub fn without_world_seed(mut self) -> Self {
        self.ensure_world_seed = false;
        self
    }

    pub fn open(self) -> Result<GameStore, GameError> {
        GameStore::open_with_options(self.path, self.ensure_world_seed)
    }
}

/// Counts reported by [`GameStore::summary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StoreSummary {
    pub regions: usize,
    pub nodes: usize,
    pub users: usize,
    pub characters: usize,
}

/// Sled-backed persistence for the exploration graph, users and characters.
pub struct GameStore {
    _db: sled::Db,
    world: sled::Tree,
    actors: sled::Tree,
}

impl GameStore {
    /// Open (or create) the store rooted at `path`, seeding the starter world
    /// if no regions exist yet.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, GameError> {
        Self::open_with_options(path, true)
    }

    fn open_with_options<P: AsRef<Path>>(path: P, seed_world: bool) -> Result<Self, GameError> {
        let path_ref = path.as_ref();
        std::fs::create_dir_all(path_ref)?;
        let db = sled::open(path_ref)?;
        let world = db.open_tree(TREE_WORLD)?;
        let actors = db.open_tree(TREE_ACTORS)?;
        let store = Self {
            _db: db,
            world,
            actors,
        };

        if seed_world {
            store.seed_world_if_needed()?;
        }

        Ok(store)
    }

    fn region_key(key: &str) -> Vec<u8> {
        format!("regions:{}", key).into_bytes()
    }

    fn node_key(region_key: &str, node_key: &str) -> Vec<u8> {
        format!("nodes:{}:{}", region_key, node_key).into_bytes()
    }

    fn user_key(id: &Uuid) -> Vec<u8> {
        format!("users:{}", id).into_bytes()
    }

    fn username_key(username: &str) -> Vec<u8> {
        format!("usernames:{}", username.to_ascii_lowercase()).into_bytes()
    }

    fn character_key(id: &Uuid) -> Vec<u8> {
        format!("characters:{}", id).into_bytes()
    }

    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>, GameError> {
        Ok(bincode::serialize(value)?)
    }

    fn deserialize<T: serde::de::DeserializeOwned + Versioned>(bytes: IVec) -> Result<T, GameError> {
        let record: T = bincode::deserialize::<T>(&bytes)?;
        if record.schema_version() != T::VERSION {
            return Err(GameError::SchemaMismatch {
                entity: T::ENTITY,
                expected: T::VERSION,
                found: record.schema_version(),
            });
        }
        Ok(record)
    }

    fn fetch<T: serde::de::DeserializeOwned + Versioned>(
        tree: &sled::Tree,
        key: &[u8],
    ) -> Result<Option<T>, GameError> {
        match tree.get(key)? {
            Some(bytes) => Ok(Some(Self::deserialize(bytes)?)),
            None => Ok(None),
        }
    }

    fn scan<T: serde::de::DeserializeOwned + Versioned>(
        tree: &sled::Tree,
        prefix: &[u8],
    ) -> Result<Vec<T>, GameError> {
        tree.scan_prefix(prefix)
            .map(|entry| {
                entry
                    .map_err(GameError::from)
                    .and_then(|(_key, value)| Self::deserialize(value))
            })
            .collect()
    }

    // ------------------------------------------------------------------
    // Regions and nodes
    // ------------------------------------------------------------------

    /// Insert or update a region. The key must be a valid slug.
    pub fn put_region(&self, mut region: RegionRecord) -> Result<(), GameError> {
        validate_key(&region.key)?;
        region.schema_version = REGION_SCHEMA_VERSION;
        let bytes = Self::serialize(&region)?;
        self.world.insert(Self::region_key(&region.key), bytes)?;
        self.world.flush()?;
        debug!("stored region {}", region.key);
        Ok(())
    }

    pub fn get_region(&self, key: &str) -> Result<RegionRecord, GameError> {
        Self::fetch(&self.world, &Self::region_key(key))?
            .ok_or_else(|| GameError::NotFound(format!("region: {}", key)))
    }

    pub fn list_regions(&self) -> Result<Vec<RegionRecord>, GameError> {
        Self::scan(&self.world, b"regions:")
    }

    /// Insert or update a node. Both keys must be valid slugs and the region must exist.
    pub fn put_node(&self, mut node: NodeRecord) -> Result<(), GameError> {
        validate_key(&node.region_key)?;
        validate_key(&node.key)?;
        if !self.world.contains_key(Self::region_key(&node.region_key))? {
            return Err(GameError::NotFound(format!("region: {}", node.region_key)));
        }
        node.schema_version = NODE_SCHEMA_VERSION;
        let bytes = Self::serialize(&node)?;
        self.world
            .insert(Self::node_key(&node.region_key, &node.key), bytes)?;
        self.world.flush()?;
        debug!("stored node {}:{}", node.region_key, node.key);
        Ok(())
    }

    pub fn get_node(&self, region_key: &str, node_key: &str) -> Result<NodeRecord, GameError> {
        Self::fetch(&self.world, &Self::node_key(region_key, node_key))?
            .ok_or_else(|| GameError::NotFound(format!("node: {}:{}", region_key, node_key)))
    }

    pub fn list_nodes_in_region(&self, region_key: &str) -> Result<Vec<NodeRecord>, GameError> {
        let prefix = format!("nodes:{}:", region_key);
        Self::scan(&self.world, prefix.as_bytes())
    }

    /// Insert regions then nodes. Returns the number of records written.
    pub fn load_world(
        &self,
        regions: Vec<RegionRecord>,
        nodes: Vec<NodeRecord>,
    ) -> Result<usize, GameError> {
        let mut inserted = 0usize;
        for region in regions {
            self.put_region(region)?;
            inserted += 1;
        }
        for node in nodes {
            self.put_node(node)?;
            inserted += 1;
        }
        Ok(inserted)
    }

    pub fn seed_world_if_needed(&self) -> Result<usize, GameError> {
        if self.world.scan_prefix(b"regions:").next().is_some() {
            return Ok(0);
        }
        let (regions, nodes) = canonical_world_seed(Utc::now());
        let inserted = self.load_world(regions, nodes)?;
        info!("seeded starter world ({} records)", inserted);
        Ok(inserted)
    }

    // ------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------

    /// Insert or update a user. Usernames are unique, compared case-insensitively.
    pub fn put_user(&self, mut user: UserRecord) -> Result<(), GameError> {
        let mut errors = ValidationErrors::new();
        crate::validation::require_present(&mut errors, "username", &user.username);
        if let Some(existing) = self.find_user_by_username(&user.username)? {
            if existing.id != user.id {
                errors.add("username", "has already been taken");
            }
        }
        errors.into_result()?;

        // Renames release the previous username
        let previous: Option<UserRecord> = Self::fetch(&self.actors, &Self::user_key(&user.id))?;
        if let Some(previous) = previous {
            if !previous.username.eq_ignore_ascii_case(&user.username) {
                self.actors.remove(Self::username_key(&previous.username))?;
            }
        }

        user.schema_version = USER_SCHEMA_VERSION;
        let bytes = Self::serialize(&user)?;
        self.actors.insert(Self::user_key(&user.id), bytes)?;
        self.actors
            .insert(Self::username_key(&user.username), user.id.as_bytes().to_vec())?;
        self.actors.flush()?;
        Ok(())
    }

    pub fn get_user(&self, id: &Uuid) -> Result<UserRecord, GameError> {
        Self::fetch(&self.actors, &Self::user_key(id))?
            .ok_or_else(|| GameError::NotFound(format!("user: {}", id)))
    }

    pub fn find_user_by_username(&self, username: &str) -> Result<Option<UserRecord>, GameError> {
        let Some(raw) = self.actors.get(Self::username_key(username))? else {
            return Ok(None);
        };
        let id = Uuid::from_slice(&raw)
            .map_err(|e| GameError::NotFound(format!("user index for {}: {}", username, e)))?;
        Self::fetch(&self.actors, &Self::user_key(&id))
    }

    // ------------------------------------------------------------------
    // Characters
    // ------------------------------------------------------------------

    /// Validate a character against the record rules and the stored users.
    /// A `user_id` that names no stored user counts as a blank user.
    pub fn validate_character(&self, character: &CharacterRecord) -> Result<(), GameError> {
        let mut errors = match character.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };
        if let Some(user_id) = character.user_id {
            if !self.actors.contains_key(Self::user_key(&user_id))? {
                errors.add("user", BLANK_MESSAGE);
            }
        }
        Ok(errors.into_result()?)
    }

    /// Validate and insert a new character, returning the stored record.
    /// An id that is already stored is rejected instead of overwritten.
    pub fn create_character(
        &self,
        character: CharacterRecord,
    ) -> Result<CharacterRecord, GameError> {
        if self.actors.contains_key(Self::character_key(&character.id))? {
            let mut errors = ValidationErrors::new();
            errors.add("id", "has already been taken");
            return Err(errors.into());
        }
        self.put_character(character.clone())?;
        self.get_character(&character.id)
    }

    /// Validate and insert or update a character.
    pub fn put_character(&self, mut character: CharacterRecord) -> Result<(), GameError> {
        self.validate_character(&character)?;
        character.schema_version = CHARACTER_SCHEMA_VERSION;
        character.touch();
        let bytes = Self::serialize(&character)?;
        self.actors
            .insert(Self::character_key(&character.id), bytes)?;
        self.actors.flush()?;
        debug!(
            "stored character {} at {}",
            character.id,
            character.node_key().unwrap_or("nowhere")
        );
        Ok(())
    }

    pub fn get_character(&self, id: &Uuid) -> Result<CharacterRecord, GameError> {
        Self::fetch(&self.actors, &Self::character_key(id))?
            .ok_or_else(|| GameError::NotFound(format!("character: {}", id)))
    }

    pub fn list_characters_for_user(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<CharacterRecord>, GameError> {
        let all: Vec<CharacterRecord> = Self::scan(&self.actors, b"characters:")?;
        Ok(all
            .into_iter()
            .filter(|c| c.user_id.as_ref() == Some(user_id))
            .collect())
    }

    /// Remove a character. Returns false if it did not exist.
    pub fn delete_character(&self, id: &Uuid) -> Result<bool, GameError> {
        let removed = self.actors.remove(Self::character_key(id))?;
        self.actors.flush()?;
        Ok(removed.is_some())
    }

    pub fn summary(&self) -> Result<StoreSummary, GameError> {
        Ok(StoreSummary {
            regions: self.world.scan_prefix(b"regions:").count(),
            nodes: self.world.scan_prefix(b"nodes:").count(),
            users: self.actors.scan_prefix(b"users:").count(),
            characters: self.actors.scan_prefix(b"characters:").count(),
        })
    }
}

impl NodeDirectory for GameStore {
    type Error = GameError;

    fn find_node(&self, region_key: &str, node_key: &str) -> Result<Option<NodeRecord>, GameError> {
        Self::fetch(&self.world, &Self::node_key(region_key, node_key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::state::{STARTER_NODE_KEYS, STARTER_REGION_KEYS};
    use tempfile::TempDir;

    #[test]
    fn store_round_trip_character() {
        let dir = TempDir::new().expect("tempdir");
        let store = GameStoreBuilder::new(dir.path()).open().expect("store");
        let user = UserRecord::new("misty");
        store.put_user(user.clone()).expect("put user");

        let character = CharacterRecord::for_user("Ash", &user).with_node_key("forest:clearing");
        let stored = store.create_character(character.clone()).expect("create");
        assert_eq!(stored.id, character.id);
        assert_eq!(stored.name, "Ash");
        assert_eq!(stored.node_key(), Some("forest:clearing"));
        assert_eq!(stored.schema_version, CHARACTER_SCHEMA_VERSION);
    }

    #[test]
    fn seeding_world_only_happens_once() {
        let dir = TempDir::new().expect("tempdir");
        {
            let store = GameStoreBuilder::new(dir.path()).open().expect("store");
            for key in STARTER_REGION_KEYS {
                store.get_region(key).expect("region present");
            }
        }

        let store = GameStoreBuilder::new(dir.path())
            .without_world_seed()
            .open()
            .expect("reopen store");
        let count = store.seed_world_if_needed().expect("seed check");
        assert_eq!(count, 0, "should not reseed when regions already exist");
        for raw in STARTER_NODE_KEYS {
            let (region, node) = raw.split_once(':').expect("seed key");
            assert!(store.find_node(region, node).expect("lookup").is_some());
        }
    }

    #[test]
    fn unseeded_store_is_empty() {
        let dir = TempDir::new().expect("tempdir");
        let store = GameStoreBuilder::new(dir.path())
            .without_world_seed()
            .open()
            .expect("store");
        assert_eq!(store.summary().expect("summary"), StoreSummary::default());
    }

    #[test]
    fn node_requires_existing_region() {
        let dir = TempDir::new().expect("tempdir");
        let store = GameStoreBuilder::new(dir.path())
            .without_world_seed()
            .open()
            .expect("store");
        let err = store
            .put_node(NodeRecord::new("swamp", "reeds", "Reeds"))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn node_key_with_separator_is_rejected() {
        let dir = TempDir::new().expect("tempdir");
        let store = GameStoreBuilder::new(dir.path()).open().expect("store");
        let err = store
            .put_node(NodeRecord::new("forest", "deep:woods", "Deep Woods"))
            .unwrap_err();
        assert!(matches!(err, GameError::InvalidKey(_)));
    }

    #[test]
    fn usernames_are_unique() {
        let dir = TempDir::new().expect("tempdir");
        let store = GameStoreBuilder::new(dir.path()).open().expect("store");
        store.put_user(UserRecord::new("misty")).expect("first");
        match store.put_user(UserRecord::new("Misty")) {
            Err(GameError::Validation(errors)) => {
                assert_eq!(errors.on("username"), vec!["has already been taken"]);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn renaming_user_releases_old_username() {
        let dir = TempDir::new().expect("tempdir");
        let store = GameStoreBuilder::new(dir.path()).open().expect("store");
        let mut user = UserRecord::new("misty");
        store.put_user(user.clone()).expect("put");

        user.username = "misty2".to_string();
        store.put_user(user.clone()).expect("rename");

        assert!(store.find_user_by_username("misty").expect("lookup").is_none());
        let renamed = store
            .find_user_by_username("misty2")
            .expect("lookup")
            .expect("renamed user");
        assert_eq!(renamed.id, user.id);

        let newcomer = UserRecord::new("misty");
        store.put_user(newcomer.clone()).expect("old name is free");
        let found = store
            .find_user_by_username("misty")
            .expect("lookup")
            .expect("newcomer");
        assert_eq!(found.id, newcomer.id);
    }

    #[test]
    fn changing_username_case_keeps_index() {
        let dir = TempDir::new().expect("tempdir");
        let store = GameStoreBuilder::new(dir.path()).open().expect("store");
        let mut user = UserRecord::new("misty");
        store.put_user(user.clone()).expect("put");
        user.username = "Misty".to_string();
        store.put_user(user.clone()).expect("recase");
        let found = store
            .find_user_by_username("misty")
            .expect("lookup")
            .expect("user");
        assert_eq!(found.username, "Misty");
    }

    #[test]
    fn create_character_rejects_existing_id() {
        let dir = TempDir::new().expect("tempdir");
        let store = GameStoreBuilder::new(dir.path()).open().expect("store");
        let user = UserRecord::new("misty");
        store.put_user(user.clone()).expect("put user");

        let first = store
            .create_character(CharacterRecord::for_user("Ash", &user))
            .expect("create");
        let mut duplicate = first.clone();
        duplicate.name = "Gary".to_string();
        match store.create_character(duplicate) {
            Err(GameError::Validation(errors)) => {
                assert_eq!(errors.on("id"), vec!["has already been taken"]);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
        assert_eq!(store.get_character(&first.id).expect("get").name, "Ash");
    }

    #[test]
    fn untrimmed_node_key_is_rejected() {
        let dir = TempDir::new().expect("tempdir");
        let store = GameStoreBuilder::new(dir.path()).open().expect("store");
        let err = store
            .put_node(NodeRecord::new(" forest", "clearing", "Sunlit Clearing"))
            .unwrap_err();
        assert!(matches!(err, GameError::InvalidKey(_)));
        let err = store
            .put_region(RegionRecord::new("swamp ", "Swamp"))
            .unwrap_err();
        assert!(matches!(err, GameError::InvalidKey(_)));
    }

    #[test]
    fn unknown_user_counts_as_blank() {
        let dir = TempDir::new().expect("tempdir");
        let store = GameStoreBuilder::new(dir.path()).open().expect("store");
        let character = CharacterRecord::new("Ash", Some(Uuid::new_v4()));
        match store.validate_character(&character) {
            Err(GameError::Validation(errors)) => {
                assert_eq!(errors.on("user"), vec![BLANK_MESSAGE]);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
