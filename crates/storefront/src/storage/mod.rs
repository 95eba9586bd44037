//! Durable key-value storage for persisted store collections.
//!
//! The store writes each collection as one JSON document under a fixed key
//! (see [`keys`]). Backends only move strings around; they know nothing about
//! carts or wishlists.
//!
//! # Backends
//!
//! - [`MemoryStorage`] - in-process map, optionally with a byte quota
//! - [`FileStorage`] - one file per key in a per-client directory

mod file;
mod memory;

use std::fmt::Debug;

use thiserror::Error;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Fixed storage keys for the persisted collections.
pub mod keys {
    /// Key for the ordered list of cart lines.
    pub const CART: &str = "cart";

    /// Key for the ordered list of wishlist products.
    pub const WISHLIST: &str = "wishlist";
}

/// Errors returned by storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the underlying file failed.
    #[error("storage I/O error for key {key:?}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// The write would exceed the configured size limit.
    #[error("storage quota of {limit} bytes exceeded writing key {key:?}")]
    QuotaExceeded { key: String, limit: usize },

    /// The key contains characters that cannot be stored.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    /// The backend cannot be used at all (e.g. a poisoned lock).
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Synchronous string key-value storage.
///
/// Implementations use interior mutability so a single instance can be
/// shared behind an `Arc` by the store that owns it.
pub trait Storage: Send + Sync + Debug {
    /// Read the value under `key`. Returns `Ok(None)` if the key is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Insert or replace the value under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the value could not be written durably.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Succeeds if the key was already absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be modified.
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Returns true if calls may block the thread on disk I/O.
    fn blocks_on_io(&self) -> bool {
        false
    }
}

/// Keys map directly to file names, so only a conservative alphabet is allowed.
pub(crate) fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}
