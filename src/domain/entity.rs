//! Domain Layer - Core Entity Trait
//!
//! Every collection record has a string id that is unique within its collection
//! and never changes after creation.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Core trait for all collection records
pub trait Entity: Sized + Send + Sync + Clone + Serialize + DeserializeOwned + 'static {
    /// Name of the remote collection holding this entity
    const COLLECTION: &'static str;
    /// Human readable name used in user-facing messages
    const LABEL: &'static str;

    fn id(&self) -> &str;

    fn set_id(&mut self, id: String);

    /// Names of required fields that are blank in this record
    fn missing_fields(&self) -> Vec<&'static str> {
        Vec::new()
    }
}

/// Common result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level errors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum DomainError {
    #[error("failed to fetch {collection}: {message}")]
    Fetch { collection: String, message: String },
    #[error("failed to write {collection}: {message}")]
    Write { collection: String, message: String },
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("{collection}/{id} not found")]
    NotFound { collection: String, id: String },
    #[error("{collection}/{id} was modified by someone else")]
    Conflict { collection: String, id: String },
    #[error("malformed {collection} record: {message}")]
    Serialization { collection: String, message: String },
}

impl DomainError {
    pub fn fetch(collection: &str, message: impl Into<String>) -> Self {
        DomainError::Fetch {
            collection: collection.to_string(),
            message: message.into(),
        }
    }

    pub fn write(collection: &str, message: impl Into<String>) -> Self {
        DomainError::Write {
            collection: collection.to_string(),
            message: message.into(),
        }
    }

    pub fn not_found(collection: &str, id: &str) -> Self {
        DomainError::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        }
    }

    pub fn conflict(collection: &str, id: &str) -> Self {
        DomainError::Conflict {
            collection: collection.to_string(),
            id: id.to_string(),
        }
    }

    pub fn serialization(collection: &str, message: impl Into<String>) -> Self {
        DomainError::Serialization {
            collection: collection.to_string(),
            message: message.into(),
        }
    }

    /// Build the validation error for a set of blank required fields
    pub fn missing(fields: &[&str]) -> Self {
        DomainError::Validation(format!("Please fill in: {}", fields.join(", ")))
    }

    /// Text shown to the user when this error surfaces
    pub fn user_message(&self) -> String {
        match self {
            DomainError::Fetch { .. } => "Failed to load data. Please try again.".to_string(),
            DomainError::Write { .. } | DomainError::Serialization { .. } => {
                "Failed to save changes. Please try again.".to_string()
            }
            DomainError::Validation(msg) => msg.clone(),
            DomainError::NotFound { .. } => {
                "This item no longer exists. Refresh to see the latest data.".to_string()
            }
            DomainError::Conflict { .. } => {
                "This item was changed by someone else. Reload it and reapply your edits.".to_string()
            }
        }
    }
}

/// True when an optional text field holds something other than whitespace
pub fn is_filled(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|s| !s.trim().is_empty())
}

/// Collect the names of blank required fields
pub fn blank_fields(fields: &[(&'static str, &Option<String>)]) -> Vec<&'static str> {
    fields
        .iter()
        .filter(|(_, value)| !is_filled(value))
        .map(|(name, _)| *name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_fields() {
        let title = Some("Hello".to_string());
        let body = Some("   ".to_string());
        let author = None;
        let missing = blank_fields(&[("title", &title), ("content", &body), ("author", &author)]);
        assert_eq!(missing, vec!["content", "author"]);
    }

    #[test]
    fn test_user_messages_hide_internals() {
        let err = DomainError::write("blogposts", "connection reset");
        assert!(!err.user_message().contains("connection reset"));
        assert_eq!(
            DomainError::missing(&["title"]).user_message(),
            "Please fill in: title"
        );
    }
}
