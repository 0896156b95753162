use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const USER_SCHEMA_VERSION: u8 = 1;
pub const REGION_SCHEMA_VERSION: u8 = 1;
pub const NODE_SCHEMA_VERSION: u8 = 1;
pub const CHARACTER_SCHEMA_VERSION: u8 = 1;

/// Account that owns one or more characters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserRecord {
    pub id: Uuid,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub schema_version: u8,
}

impl UserRecord {
    pub fn new(username: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.to_string(),
            created_at: Utc::now(),
            schema_version: USER_SCHEMA_VERSION,
        }
    }
}

/// A named area of the exploration graph. Nodes belong to exactly one region.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegionRecord {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub schema_version: u8,
}

impl RegionRecord {
    pub fn new(key: &str, name: &str) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            description: String::new(),
            created_at: Utc::now(),
            schema_version: REGION_SCHEMA_VERSION,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }
}

/// Exploration node, identified by the pair `(region_key, key)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeRecord {
    pub key: String,
    pub region_key: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub schema_version: u8,
}

impl NodeRecord {
    pub fn new(region_key: &str, key: &str, name: &str) -> Self {
        Self {
            key: key.to_string(),
            region_key: region_key.to_string(),
            name: name.to_string(),
            description: String::new(),
            created_at: Utc::now(),
            schema_version: NODE_SCHEMA_VERSION,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }
}
