use thiserror::Error;

use crate::validation::{KeyError, ValidationErrors};

/// Errors that can arise while interacting with the game store.
#[derive(Debug, Error)]
pub enum GameError {
    /// Wrapper around sled's error type.
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),

    /// Wrapper around bincode serialization and deserialization errors.
    #[error("serialization error: {0}")]
    Bincode(#[from] bincode::Error),

    /// Wrapper around IO errors (directory creation, seed files).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Seed files that fail to parse.
    #[error("seed parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Returned when fetching a record that is not present.
    #[error("record not found: {0}")]
    NotFound(String),

    /// Returned when deserializing a record with an unexpected schema version.
    #[error("schema mismatch for {entity}: expected {expected}, got {found}")]
    SchemaMismatch {
        entity: &'static str,
        expected: u8,
        found: u8,
    },

    /// A record failed field validation on save.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// A region or node key that cannot be stored.
    #[error("invalid key: {0}")]
    InvalidKey(#[from] KeyError),
}

impl GameError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, GameError::NotFound(_))
    }
}
