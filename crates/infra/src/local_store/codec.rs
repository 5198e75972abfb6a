use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use resale_inventory::InventoryItem;

use super::seed::demo_items;
use super::{LocalStore, LocalStoreError};

/// The inventory collection encoded as one JSON array under a fixed key.
///
/// A slot that has never been written (or holds only whitespace) is seeded
/// with the demo dataset on first read. An empty array is a real, empty
/// collection and is kept as is.
pub struct LocalCollection {
    store: Arc<dyn LocalStore>,
    key: String,
    // Serialises read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl LocalCollection {
    pub fn new(store: Arc<dyn LocalStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Current collection, seeding the demo dataset if the slot is empty.
    pub fn load_or_seed(&self, now: DateTime<Utc>) -> Result<Vec<InventoryItem>, LocalStoreError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|p| p.into_inner());
        self.load_locked(now)
    }

    /// Overwrite the whole collection.
    pub fn replace(&self, items: &[InventoryItem]) -> Result<(), LocalStoreError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|p| p.into_inner());
        self.store_locked(items)
    }

    /// Load, let `f` edit the collection, write it back.
    pub fn mutate<R>(
        &self,
        now: DateTime<Utc>,
        f: impl FnOnce(&mut Vec<InventoryItem>) -> R,
    ) -> Result<R, LocalStoreError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|p| p.into_inner());
        let mut items = self.load_locked(now)?;
        let out = f(&mut items);
        self.store_locked(&items)?;
        Ok(out)
    }

    fn load_locked(&self, now: DateTime<Utc>) -> Result<Vec<InventoryItem>, LocalStoreError> {
        match self.store.read(&self.key)? {
            Some(text) if !text.trim().is_empty() => decode(&text),
            _ => {
                let seeded = demo_items(now);
                self.store_locked(&seeded)?;
                info!(key = %self.key, records = seeded.len(), "seeded empty local collection");
                Ok(seeded)
            }
        }
    }

    fn store_locked(&self, items: &[InventoryItem]) -> Result<(), LocalStoreError> {
        let text = serde_json::to_string(items)
            .map_err(|e| LocalStoreError::Corrupt(format!("encoding collection: {e}")))?;
        self.store.write(&self.key, &text)?;
        debug!(key = %self.key, records = items.len(), "local collection written");
        Ok(())
    }
}

fn decode(text: &str) -> Result<Vec<InventoryItem>, LocalStoreError> {
    serde_json::from_str(text).map_err(|e| LocalStoreError::Corrupt(e.to_string()))
}

impl core::fmt::Debug for LocalCollection {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LocalCollection")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local_store::InMemoryLocalStore;
    use resale_core::ItemId;
    use resale_inventory::NewItem;

    fn collection() -> (Arc<InMemoryLocalStore>, LocalCollection) {
        let store = Arc::new(InMemoryLocalStore::new());
        let coll = LocalCollection::new(store.clone(), "inv");
        (store, coll)
    }

    #[test]
    fn first_read_seeds_and_persists_demo_data() {
        let (store, coll) = collection();
        let items = coll.load_or_seed(Utc::now()).unwrap();
        assert_eq!(items.len(), 4);
        assert!(store.read("inv").unwrap().is_some());
    }

    #[test]
    fn empty_array_is_not_reseeded() {
        let (store, coll) = collection();
        store.write("inv", "[]").unwrap();
        assert!(coll.load_or_seed(Utc::now()).unwrap().is_empty());
    }

    #[test]
    fn corrupt_slot_is_reported() {
        let (store, coll) = collection();
        store.write("inv", "{not json").unwrap();
        assert!(matches!(
            coll.load_or_seed(Utc::now()),
            Err(LocalStoreError::Corrupt(_))
        ));
    }

    #[test]
    fn mutate_writes_back() {
        let (_store, coll) = collection();
        let now = Utc::now();
        coll.replace(&[]).unwrap();
        coll.mutate(now, |items| {
            items.insert(
                0,
                NewItem::available("S", "Queen", "Casper", "Nuevo", 10.0)
                    .into_item(ItemId::new("x"), now),
            )
        })
        .unwrap();

        let items = coll.load_or_seed(now).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id.as_str(), "x");
    }
}
