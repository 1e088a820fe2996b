//! File store
//!
//! One file per key inside a directory. Writes go to a temporary sibling first and are then
//! renamed into place, so a crash mid-write leaves the previous value intact.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use crate::persistence::{KeyValueStore, StoreError, is_valid_key};

/// A store backed by a directory on disk.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Store files under `dir`, created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the stored files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> Result<PathBuf, StoreError> {
        if !is_valid_key(key) {
            return Err(StoreError::InvalidKey(key.to_string()));
        }

        Ok(self.dir.join(key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path(key)?) {
            Ok(value) => Ok(Some(value)),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path(key)?;
        let staging = self.dir.join(format!(".{key}.tmp"));

        fs::create_dir_all(&self.dir)?;
        fs::write(&staging, value)?;
        fs::rename(&staging, &path)?;

        tracing::trace!(path = %path.display(), bytes = value.len(), "stored value");

        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.path(key)?) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn persists_values_across_instances() -> TestResult {
        let dir = tempfile::tempdir()?;

        FileStore::new(dir.path()).set("cart", "{}")?;

        let store = FileStore::new(dir.path());

        assert_eq!(store.get("cart")?, Some("{}".to_string()));
        assert_eq!(store.get("missing")?, None);

        Ok(())
    }

    #[test]
    fn creates_directory_on_first_write() -> TestResult {
        let dir = tempfile::tempdir()?;
        let mut store = FileStore::new(dir.path().join("nested").join("state"));

        store.set("session", "sess_abc")?;

        assert!(store.dir().join("session").is_file());

        Ok(())
    }

    #[test]
    fn overwrites_and_removes() -> TestResult {
        let dir = tempfile::tempdir()?;
        let mut store = FileStore::new(dir.path());

        store.set("cart", "one")?;
        store.set("cart", "two")?;
        assert_eq!(store.get("cart")?, Some("two".to_string()));

        store.remove("cart")?;
        store.remove("cart")?;
        assert_eq!(store.get("cart")?, None);

        Ok(())
    }

    #[test]
    fn refuses_path_traversal() -> TestResult {
        let dir = tempfile::tempdir()?;
        let mut store = FileStore::new(dir.path());

        assert!(matches!(
            store.set("../escape", "x"),
            Err(StoreError::InvalidKey(_))
        ));
        assert!(matches!(store.get(""), Err(StoreError::InvalidKey(_))));

        Ok(())
    }
}
