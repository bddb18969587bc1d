//! Durable key-value slots.
//!
//! The cart is mirrored into named string slots, the same model a browser's
//! local storage offers. [`KeyValueStore`] is that model; the storefront
//! ships two implementations:
//!
//! - [`MemoryStore`] - process-local map, optionally with a byte quota
//! - [`FileStore`] - one file per key inside a data directory

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use thiserror::Error;

/// Errors raised by a [`KeyValueStore`].
#[derive(Debug, Error)]
pub enum StorageError {
    /// The key contains characters that cannot name a slot.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    /// Writing the value would exceed the store's capacity.
    #[error("storage quota exceeded writing {key} ({needed} bytes, limit {limit})")]
    QuotaExceeded {
        key: String,
        needed: usize,
        limit: usize,
    },

    /// Underlying I/O failed.
    #[error("storage I/O error on {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// A value could not be encoded before writing.
    #[error("failed to encode {key}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// A lock guarding the store was poisoned by a panicking writer.
    #[error("storage lock poisoned")]
    Poisoned,
}

/// A set of named string slots that survive restarts.
///
/// Writes fully replace the previous value of a slot; there are no partial or
/// merge writes. Removing an absent key is not an error.
pub trait KeyValueStore: Send + Sync {
    /// Read a slot, returning `None` if it has never been written.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the slot exists but cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite a slot.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the value cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a slot if present.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if an existing slot cannot be removed.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Reject keys that could escape a data directory or collide after encoding.
pub(crate) fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key.len() <= 128
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}
