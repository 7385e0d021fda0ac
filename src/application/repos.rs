//! Storage port describing the key/value slot the post store mirrors into.

use thiserror::Error;

/// Slot holding the JSON array of posts.
pub const POSTS_SLOT: &str = "posts";

/// Slot holding the theme flag as a JSON boolean.
pub const THEME_SLOT: &str = "theme";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage file `{path}` is corrupt: {message}")]
    Corrupt { path: String, message: String },
    #[error("failed to encode slot `{slot}`: {source}")]
    Encode {
        slot: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl StorageError {
    pub fn corrupt(path: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Corrupt {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

/// String-valued key/value slots with last-write-wins semantics.
///
/// Implementations mirror browser local storage: values are opaque strings and
/// every `set` replaces the whole value of a slot.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}
