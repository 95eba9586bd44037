//! Reading and writing collection snapshots through a [`Storage`] backend.
//!
//! Both directions are infallible from the caller's point of view: failures
//! are logged and reported as a boolean or an empty collection.
//!
//! Backends that touch the disk are called through [`tokio::task::block_in_place`]
//! when running on a multi-threaded runtime, so other tasks on the worker move
//! elsewhere while the write completes.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::runtime::{Handle, RuntimeFlavor};

use crate::storage::Storage;

/// Load the collection stored under `key`.
///
/// Absent, unreadable, and malformed documents all yield an empty list.
pub(crate) fn hydrate<T: DeserializeOwned>(storage: &dyn Storage, key: &str) -> Vec<T> {
    let raw = match run_io(storage, || storage.get(key)) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            tracing::warn!(key, error = %e, "Failed to read persisted collection, starting empty");
            return Vec::new();
        }
    };

    match serde_json::from_str(&raw) {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(key, error = %e, "Persisted collection is malformed, starting empty");
            Vec::new()
        }
    }
}

/// Write `items` under `key`. Returns true if the write succeeded.
///
/// An empty collection removes the key instead, which reads back as empty.
pub(crate) fn commit<T: Serialize>(storage: &dyn Storage, key: &str, items: &[T]) -> bool {
    let written = if items.is_empty() {
        run_io(storage, || storage.remove(key))
    } else {
        let json = match serde_json::to_string(items) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(key, error = %e, "Failed to serialize collection");
                return false;
            }
        };
        run_io(storage, || storage.set(key, &json))
    };

    match written {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(
                key,
                error = %e,
                "Failed to persist collection, keeping in-memory state"
            );
            false
        }
    }
}

/// Run a storage call, stepping off the async worker if it may block.
fn run_io<R>(storage: &dyn Storage, call: impl FnOnce() -> R) -> R {
    let multi_threaded = Handle::try_current()
        .is_ok_and(|handle| handle.runtime_flavor() == RuntimeFlavor::MultiThread);

    if storage.blocks_on_io() && multi_threaded {
        tokio::task::block_in_place(call)
    } else {
        call()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::{FileStorage, MemoryStorage};

    #[test]
    fn test_hydrate_missing_key_is_empty() {
        let storage = MemoryStorage::new();
        let items: Vec<u32> = hydrate(&storage, "cart");
        assert!(items.is_empty());
    }

    #[test]
    fn test_hydrate_malformed_is_empty() {
        let storage = MemoryStorage::new();
        storage.set("cart", "{not json").unwrap();
        let items: Vec<u32> = hydrate(&storage, "cart");
        assert!(items.is_empty());

        storage.set("cart", r#"{"an":"object"}"#).unwrap();
        let items: Vec<u32> = hydrate(&storage, "cart");
        assert!(items.is_empty());
    }

    #[test]
    fn test_commit_then_hydrate() {
        let storage = MemoryStorage::new();
        assert!(commit(&storage, "wishlist", &[3_u32, 1, 2]));
        let items: Vec<u32> = hydrate(&storage, "wishlist");
        assert_eq!(items, vec![3, 1, 2]);
    }

    #[test]
    fn test_commit_empty_removes_key() {
        let storage = MemoryStorage::new();
        assert!(commit(&storage, "cart", &[1_u32]));
        assert!(commit::<u32>(&storage, "cart", &[]));
        assert_eq!(storage.get("cart").unwrap(), None);
        assert!(storage.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_file_commit_on_multi_thread_runtime() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("client"));

        assert!(commit(&storage, "wishlist", &[4_u32, 5]));
        let items: Vec<u32> = hydrate(&storage, "wishlist");
        assert_eq!(items, vec![4, 5]);

        assert!(commit::<u32>(&storage, "wishlist", &[]));
        assert!(!dir.path().join("client").join("wishlist.json").exists());
    }

    #[tokio::test]
    async fn test_file_commit_on_current_thread_runtime() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());

        assert!(commit(&storage, "cart", &[7_u32]));
        let items: Vec<u32> = hydrate(&storage, "cart");
        assert_eq!(items, vec![7]);
    }

    #[test]
    fn test_commit_reports_failure() {
        let storage = MemoryStorage::with_quota(2);
        assert!(!commit(&storage, "cart", &[1_u32, 2, 3]));
        assert_eq!(storage.get("cart").unwrap(), None);
    }
}
