//! In-memory store

use rustc_hash::FxHashMap;

use crate::persistence::{KeyValueStore, StoreError, is_valid_key};

/// A store that lives as long as the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: FxHashMap<String, String>,
}

impl MemoryStore {
    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn checked(key: &str) -> Result<&str, StoreError> {
    if is_valid_key(key) {
        Ok(key)
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(checked(key)?).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries
            .insert(checked(key)?.to_string(), value.to_string());

        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(checked(key)?);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn stores_and_removes_values() -> TestResult {
        let mut store = MemoryStore::default();

        store.set("greeting", "hello")?;
        assert_eq!(store.get("greeting")?, Some("hello".to_string()));

        store.remove("greeting")?;
        store.remove("greeting")?;
        assert_eq!(store.get("greeting")?, None);
        assert!(store.is_empty());

        Ok(())
    }

    #[test]
    fn rejects_invalid_keys() {
        let mut store = MemoryStore::default();

        assert!(matches!(
            store.set("a/b", "x"),
            Err(StoreError::InvalidKey(_))
        ));
        assert_eq!(store.len(), 0);
    }
}
