//! Composite location keys and their resolution against a node directory.
//!
//! A character's position is persisted as a single string `"<region>:<node>"`.
//! Inside the crate that string is always handled as a [`LocationKey`]; the
//! textual form exists only at the storage boundary.
//!
//! Malformed stored keys (no separator, more than one separator, or an empty
//! half) decode to `None` and therefore resolve to no node. They are never an
//! error.

use std::fmt;
use std::str::FromStr;

use log::{debug, trace};

use crate::validation::KEY_SEPARATOR;
use crate::world::character::CharacterRecord;
use crate::world::types::NodeRecord;

/// Region and node identifiers of one exploration node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocationKey {
    pub region_key: String,
    pub node_key: String,
}

impl LocationKey {
    pub fn new(region_key: impl Into<String>, node_key: impl Into<String>) -> Self {
        Self {
            region_key: region_key.into(),
            node_key: node_key.into(),
        }
    }

    /// Key of the node's own position.
    pub fn of(node: &NodeRecord) -> Self {
        Self::new(node.region_key.as_str(), node.key.as_str())
    }
}

impl fmt::Display for LocationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.region_key, KEY_SEPARATOR, self.node_key)
    }
}

/// Error returned when parsing a location key from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed location key '{0}' (expected \"<region>:<node>\")")]
pub struct MalformedKey(pub String);

impl FromStr for LocationKey {
    type Err = MalformedKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(KEY_SEPARATOR);
        match (parts.next(), parts.next(), parts.next()) {
            (Some(region), Some(node), None) if !region.is_empty() && !node.is_empty() => {
                Ok(LocationKey::new(region, node))
            }
            _ => Err(MalformedKey(s.to_string())),
        }
    }
}

/// Decode a stored location key. Absent, empty and malformed values yield `None`.
pub fn decode(location_key: Option<&str>) -> Option<LocationKey> {
    let raw = location_key.filter(|k| !k.is_empty())?;
    match raw.parse::<LocationKey>() {
        Ok(key) => Some(key),
        Err(e) => {
            debug!("{}; treating as no location", e);
            None
        }
    }
}

/// Encode a node's position as `"<region>:<node>"`.
pub fn encode(node: &NodeRecord) -> String {
    LocationKey::of(node).to_string()
}

/// Lookup capability for exploration nodes keyed by region and node identifiers.
///
/// A miss is `Ok(None)`. Errors are reserved for the directory's own failures
/// (storage, decoding).
pub trait NodeDirectory {
    type Error;

    fn find_node(&self, region_key: &str, node_key: &str)
        -> Result<Option<NodeRecord>, Self::Error>;
}

/// Translates between stored location keys and live node records.
pub struct LocationResolver<'a, D: NodeDirectory + ?Sized> {
    directory: &'a D,
}

impl<'a, D: NodeDirectory + ?Sized> LocationResolver<'a, D> {
    pub fn new(directory: &'a D) -> Self {
        Self { directory }
    }

    pub fn resolve_node(&self, key: &LocationKey) -> Result<Option<NodeRecord>, D::Error> {
        let found = self.directory.find_node(&key.region_key, &key.node_key)?;
        if found.is_none() {
            trace!("no node at {}", key);
        }
        Ok(found)
    }

    /// The node a character stands on. Characters without a (well-formed)
    /// location key never reach the directory.
    pub fn current_node(
        &self,
        character: &CharacterRecord,
    ) -> Result<Option<NodeRecord>, D::Error> {
        match decode(character.node_key()) {
            Some(key) => self.resolve_node(&key),
            None => Ok(None),
        }
    }

    /// Point a character at `node`, or clear its location when `None`.
    pub fn set_current_node(&self, character: &mut CharacterRecord, node: Option<&NodeRecord>) {
        character.set_node_key(node.map(encode));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::collections::HashMap;
    use std::convert::Infallible;
    use uuid::Uuid;

    /// In-memory directory that counts lookups.
    #[derive(Default)]
    struct MapDirectory {
        nodes: HashMap<(String, String), NodeRecord>,
        lookups: Cell<usize>,
    }

    impl MapDirectory {
        fn with(nodes: &[NodeRecord]) -> Self {
            let mut dir = Self::default();
            for node in nodes {
                dir.nodes
                    .insert((node.region_key.clone(), node.key.clone()), node.clone());
            }
            dir
        }
    }

    impl NodeDirectory for MapDirectory {
        type Error = Infallible;

        fn find_node(
            &self,
            region_key: &str,
            node_key: &str,
        ) -> Result<Option<NodeRecord>, Infallible> {
            self.lookups.set(self.lookups.get() + 1);
            Ok(self
                .nodes
                .get(&(region_key.to_string(), node_key.to_string()))
                .cloned())
        }
    }

    fn hero() -> CharacterRecord {
        CharacterRecord::new("Ash", Some(Uuid::new_v4()))
    }

    #[test]
    fn decode_splits_two_part_keys() {
        assert_eq!(
            decode(Some("forest:clearing")),
            Some(LocationKey::new("forest", "clearing"))
        );
    }

    #[test]
    fn decode_absent_or_empty_is_none() {
        assert_eq!(decode(None), None);
        assert_eq!(decode(Some("")), None);
    }

    #[test]
    fn decode_malformed_is_none() {
        for raw in ["forest", "forest:clearing:north", ":clearing", "forest:", ":"] {
            assert_eq!(decode(Some(raw)), None, "expected {:?} to be rejected", raw);
        }
    }

    #[test]
    fn format_round_trip() {
        for raw in ["forest:clearing", "coast:tide_pools", "a:b"] {
            let key = decode(Some(raw)).expect("well-formed");
            assert_eq!(key.to_string(), raw);
        }
    }

    #[test]
    fn encode_uses_region_then_node() {
        let node = NodeRecord::new("forest", "clearing", "Sunlit Clearing");
        assert_eq!(encode(&node), "forest:clearing");
    }

    #[test]
    fn fresh_character_skips_lookup() {
        let dir = MapDirectory::default();
        let resolver = LocationResolver::new(&dir);
        assert_eq!(resolver.current_node(&hero()).unwrap(), None);
        assert_eq!(dir.lookups.get(), 0);
    }

    #[test]
    fn malformed_key_skips_lookup() {
        let dir = MapDirectory::default();
        let resolver = LocationResolver::new(&dir);
        let mut character = hero();
        character.set_node_key(Some("nowhere".to_string()));
        assert_eq!(resolver.current_node(&character).unwrap(), None);
        assert_eq!(dir.lookups.get(), 0);
    }

    #[test]
    fn set_then_get_returns_same_node() {
        let clearing = NodeRecord::new("forest", "clearing", "Sunlit Clearing");
        let dir = MapDirectory::with(&[clearing.clone()]);
        let resolver = LocationResolver::new(&dir);

        let mut character = hero();
        resolver.set_current_node(&mut character, Some(&clearing));
        assert_eq!(character.node_key(), Some("forest:clearing"));
        assert_eq!(resolver.current_node(&character).unwrap(), Some(clearing));
    }

    #[test]
    fn clearing_location_removes_key() {
        let clearing = NodeRecord::new("forest", "clearing", "Sunlit Clearing");
        let dir = MapDirectory::with(&[clearing.clone()]);
        let resolver = LocationResolver::new(&dir);

        let mut character = hero();
        resolver.set_current_node(&mut character, Some(&clearing));
        resolver.set_current_node(&mut character, None);
        assert_eq!(character.node_key(), None);
        assert_eq!(resolver.current_node(&character).unwrap(), None);
    }

    #[test]
    fn unknown_node_is_a_miss() {
        let dir = MapDirectory::with(&[NodeRecord::new("forest", "clearing", "Sunlit Clearing")]);
        let resolver = LocationResolver::new(&dir);
        let mut character = hero();
        character.set_node_key(Some("forest:bog".to_string()));
        assert_eq!(resolver.current_node(&character).unwrap(), None);
        assert_eq!(dir.lookups.get(), 1);
    }
}
