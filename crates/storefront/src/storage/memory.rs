//! In-process storage backend.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use super::{Storage, StorageError, validate_key};

/// Storage held in memory for the lifetime of the process.
///
/// Used when no data directory is configured and in tests. An optional quota
/// caps the total size of all stored values, which lets tests exercise the
/// "storage full" path.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryStorage {
    /// Create an empty, unbounded storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty storage that rejects writes once the stored values
    /// would exceed `bytes` in total.
    #[must_use]
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            entries: Mutex::default(),
            quota: Some(bytes),
        }
    }

    /// Number of keys currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().map_or(0, |entries| entries.len())
    }

    /// Returns true if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, String>>, StorageError> {
        self.entries
            .lock()
            .map_err(|_| StorageError::Unavailable("memory storage lock poisoned".to_string()))
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        validate_key(key)?;
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        let mut entries = self.lock()?;

        if let Some(limit) = self.quota {
            let others: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(_, v)| v.len())
                .sum();
            if others + value.len() > limit {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    limit,
                });
            }
        }

        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        self.lock()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_get_missing_key_is_none() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get("cart").unwrap(), None);
        assert!(storage.is_empty());
    }

    #[test]
    fn test_set_replaces_value() {
        let storage = MemoryStorage::new();
        storage.set("cart", "[]").unwrap();
        storage.set("cart", "[1]").unwrap();
        assert_eq!(storage.get("cart").unwrap().as_deref(), Some("[1]"));
        assert_eq!(storage.len(), 1);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let storage = MemoryStorage::new();
        storage.set("wishlist", "[]").unwrap();
        storage.remove("wishlist").unwrap();
        storage.remove("wishlist").unwrap();
        assert_eq!(storage.get("wishlist").unwrap(), None);
    }

    #[test]
    fn test_quota_counts_other_keys_but_not_replaced_value() {
        let storage = MemoryStorage::with_quota(10);
        storage.set("cart", "12345").unwrap();
        // Replacing the same key only counts the new value
        storage.set("cart", "1234567890").unwrap();

        let err = storage.set("wishlist", "x").unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { limit: 10, .. }));
        assert_eq!(storage.get("wishlist").unwrap(), None);
    }
}
