//! Field validation for persisted records and exploration keys.

use std::fmt;

/// Message attached to required fields that are missing or blank.
pub const BLANK_MESSAGE: &str = "can't be blank";

/// Maximum length of a region or node key.
pub const MAX_KEY_LENGTH: usize = 48;

/// Separator between the region and node halves of a location key.
pub const KEY_SEPARATOR: char = ':';

/// Key validation errors with helpful messages
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyError {
    #[error("key is empty")]
    Empty,

    #[error("key is too long (maximum {max} characters)")]
    TooLong { max: usize },

    #[error("key contains the location separator ':'")]
    ContainsSeparator,

    #[error("key contains invalid characters: {chars}")]
    InvalidCharacters { chars: String },
}

/// Validate a region or node key.
///
/// Keys are lowercase ASCII slugs (`a-z`, `0-9`, `_`, `-`). They never contain
/// [`KEY_SEPARATOR`], so every stored pair encodes to a decodable location key.
/// Whitespace anywhere, including at either end, is rejected rather than trimmed:
/// the caller's record must already hold the exact key that gets stored.
pub fn validate_key(key: &str) -> Result<String, KeyError> {
    if key.trim().is_empty() {
        return Err(KeyError::Empty);
    }
    if key.chars().count() > MAX_KEY_LENGTH {
        return Err(KeyError::TooLong {
            max: MAX_KEY_LENGTH,
        });
    }
    if key.contains(KEY_SEPARATOR) {
        return Err(KeyError::ContainsSeparator);
    }

    let invalid: String = key
        .chars()
        .filter(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_' || *c == '-'))
        .collect();
    if !invalid.is_empty() {
        return Err(KeyError::InvalidCharacters { chars: invalid });
    }

    Ok(key.to_string())
}

/// A single failed rule on a named field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.message)
    }
}

/// Field-level errors collected while validating a record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<String> = self.errors.iter().map(ToString::to_string).collect();
        write!(f, "{}", joined.join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Messages recorded against `field`, in insertion order.
    pub fn on(&self, field: &str) -> Vec<&str> {
        self.errors
            .iter()
            .filter(|e| e.field == field)
            .map(|e| e.message.as_str())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// `Ok(())` when nothing was recorded, otherwise the collected errors.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

/// Record [`BLANK_MESSAGE`] on `field` when `value` is empty after trimming.
pub fn require_present(errors: &mut ValidationErrors, field: &'static str, value: &str) {
    if value.trim().is_empty() {
        errors.add(field, BLANK_MESSAGE);
    }
}
