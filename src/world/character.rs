//! Player characters and their position in the exploration graph.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validation::{require_present, ValidationErrors, BLANK_MESSAGE};
use crate::world::location::{decode, LocationKey, LocationResolver, NodeDirectory};
use crate::world::types::{NodeRecord, UserRecord, CHARACTER_SCHEMA_VERSION};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CharacterRecord {
    pub id: Uuid,
    pub name: String,
    /// Owning user. Required on save; kept optional so incomplete records can be validated.
    pub user_id: Option<Uuid>,
    /// Stored form of the current node, `"<region>:<node>"`.
    #[serde(default)]
    node_key: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub schema_version: u8,
}

impl CharacterRecord {
    pub fn new(name: &str, user_id: Option<Uuid>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            user_id,
            node_key: None,
            created_at: now,
            updated_at: now,
            schema_version: CHARACTER_SCHEMA_VERSION,
        }
    }

    pub fn for_user(name: &str, user: &UserRecord) -> Self {
        Self::new(name, Some(user.id))
    }

    pub fn with_node_key(mut self, node_key: &str) -> Self {
        self.set_node_key(Some(node_key.to_string()));
        self
    }

    pub fn node_key(&self) -> Option<&str> {
        self.node_key.as_deref()
    }

    /// Overwrite the stored location key. An empty string is stored as no location.
    pub fn set_node_key(&mut self, node_key: Option<String>) {
        self.node_key = node_key.filter(|k| !k.is_empty());
    }

    /// Decoded location, if the stored key is present and well formed.
    pub fn location(&self) -> Option<LocationKey> {
        decode(self.node_key())
    }

    pub fn set_user(&mut self, user: &UserRecord) {
        self.user_id = Some(user.id);
    }

    pub fn current_node<D>(&self, directory: &D) -> Result<Option<NodeRecord>, D::Error>
    where
        D: NodeDirectory + ?Sized,
    {
        LocationResolver::new(directory).current_node(self)
    }

    pub fn set_current_node(&mut self, node: Option<&NodeRecord>) {
        self.set_node_key(node.map(crate::world::location::encode));
    }

    /// Check required fields. Errors are reported on `name` and `user`.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        require_present(&mut errors, "name", &self.name);
        if self.user_id.is_none() {
            errors.add("user", BLANK_MESSAGE);
        }
        errors.into_result()
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
