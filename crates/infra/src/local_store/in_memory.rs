use std::collections::HashMap;
use std::sync::RwLock;

use super::{LocalStore, LocalStoreError};

/// Process-local slot store.
///
/// Intended for tests/dev. Contents are lost when the value is dropped.
#[derive(Debug, Default)]
pub struct InMemoryLocalStore {
    slots: RwLock<HashMap<String, String>>,
}

impl InMemoryLocalStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStore for InMemoryLocalStore {
    fn read(&self, key: &str) -> Result<Option<String>, LocalStoreError> {
        let slots = self
            .slots
            .read()
            .map_err(|_| LocalStoreError::Io("lock poisoned".to_string()))?;
        Ok(slots.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), LocalStoreError> {
        let mut slots = self
            .slots
            .write()
            .map_err(|_| LocalStoreError::Io("lock poisoned".to_string()))?;
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unwritten_key_reads_as_none() {
        let store = InMemoryLocalStore::new();
        assert_eq!(store.read("missing").unwrap(), None);
    }

    #[test]
    fn write_replaces_previous_value() {
        let store = InMemoryLocalStore::new();
        store.write("k", "one").unwrap();
        store.write("k", "two").unwrap();
        assert_eq!(store.read("k").unwrap().as_deref(), Some("two"));
    }
}
