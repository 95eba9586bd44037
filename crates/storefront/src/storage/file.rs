//! Filesystem storage backend.
//!
//! Each key is stored as `<root>/<key>.json`. Writes go to a sibling temp
//! file first and are renamed into place, so a crash mid-write leaves the
//! previous document intact.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::{Storage, StorageError, validate_key};

/// Storage rooted at a directory on disk.
///
/// The directory is created lazily on the first write, so browsing clients
/// that never touch their cart do not leave empty directories behind.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Create a storage rooted at `root`. Performs no I/O.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory holding this storage's documents.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self.root.join(format!("{key}.json")))
    }
}

fn io_error(key: &str, source: io::Error) -> StorageError {
    StorageError::Io {
        key: key.to_string(),
        source,
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(key, e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.root).map_err(|e| io_error(key, e))?;

        let tmp = self.root.join(format!(".{key}.json.tmp"));
        let mut file = fs::File::create(&tmp).map_err(|e| io_error(key, e))?;
        file.write_all(value.as_bytes())
            .and_then(|()| file.sync_all())
            .map_err(|e| io_error(key, e))?;
        drop(file);

        fs::rename(&tmp, &path).map_err(|e| io_error(key, e))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(key, e)),
        }
    }

    fn blocks_on_io(&self) -> bool {
        true
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_directory_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("client-a"));

        assert_eq!(storage.get("cart").unwrap(), None);
        assert!(!storage.root().exists());
    }

    #[test]
    fn test_set_creates_directory_and_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("client-a"));

        storage.set("cart", r#"[{"quantity":1}]"#).unwrap();

        assert!(storage.root().join("cart.json").is_file());
        assert!(!storage.root().join(".cart.json.tmp").exists());
        assert_eq!(
            storage.get("cart").unwrap().as_deref(),
            Some(r#"[{"quantity":1}]"#)
        );
    }

    #[test]
    fn test_remove_missing_key_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());

        storage.remove("wishlist").unwrap();
        storage.set("wishlist", "[]").unwrap();
        storage.remove("wishlist").unwrap();
        assert_eq!(storage.get("wishlist").unwrap(), None);
    }

    #[test]
    fn test_rejects_path_traversal_keys() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());

        assert!(matches!(
            storage.set("../escape", "{}"),
            Err(StorageError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_unwritable_root_reports_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "file in the way").unwrap();

        let storage = FileStorage::new(&blocker);
        assert!(matches!(
            storage.set("cart", "[]"),
            Err(StorageError::Io { .. })
        ));
    }
}
