use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, RwLock, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use resale_core::ItemId;
use resale_events::ChangeNotifier;
use resale_inventory::{InventoryItem, ItemPatch, NewItem};

use super::{ChangeCallback, FeedHandle, RemoteError, RemoteStore};

/// Operation selector for fault injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteOp {
    FetchAll,
    Insert,
    Update,
    Delete,
    UploadBlob,
    Watch,
}

#[derive(Debug, Default)]
struct Faults {
    next: HashMap<RemoteOp, RemoteError>,
    outage: Option<RemoteError>,
    calls: HashMap<RemoteOp, usize>,
}

/// In-memory backend with a live change feed.
///
/// Intended for tests/dev. Ids are v7 UUIDs. Every mutation, including
/// [`InMemoryRemoteStore::external_insert`], fires the change feed.
#[derive(Debug, Default)]
pub struct InMemoryRemoteStore {
    rows: RwLock<Vec<InventoryItem>>,
    blobs: RwLock<HashMap<String, Vec<u8>>>,
    feed: ChangeNotifier,
    faults: Mutex<Faults>,
}

const PUBLIC_BASE: &str = "memory://inventory";

impl InMemoryRemoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate rows without firing the feed.
    pub fn with_rows(rows: Vec<InventoryItem>) -> Self {
        let store = Self::default();
        if let Ok(mut guard) = store.rows.write() {
            *guard = rows;
        }
        store
    }

    /// Fail the next call of `op` with `err`.
    pub fn fail_next(&self, op: RemoteOp, err: RemoteError) {
        self.faults_mut().next.insert(op, err);
    }

    /// Fail every call with `err` until cleared with `None`.
    pub fn set_outage(&self, err: Option<RemoteError>) {
        self.faults_mut().outage = err;
    }

    /// Calls made so far for `op`, failed ones included.
    pub fn call_count(&self, op: RemoteOp) -> usize {
        self.faults_mut().calls.get(&op).copied().unwrap_or(0)
    }

    pub fn rows(&self) -> Vec<InventoryItem> {
        self.rows.read().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn blob(&self, name: &str) -> Option<Vec<u8>> {
        self.blobs.read().ok()?.get(name).cloned()
    }

    /// Simulates a write made by another client.
    pub fn external_insert(&self, draft: NewItem) -> InventoryItem {
        let item = self.store_row(draft);
        self.feed.notify();
        item
    }

    fn faults_mut(&self) -> MutexGuard<'_, Faults> {
        self.faults.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn enter(&self, op: RemoteOp) -> Result<(), RemoteError> {
        let mut faults = self.faults_mut();
        *faults.calls.entry(op).or_default() += 1;
        if let Some(err) = faults.next.remove(&op) {
            return Err(err);
        }
        match &faults.outage {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn store_row(&self, draft: NewItem) -> InventoryItem {
        let item = draft.into_item(ItemId::new(Uuid::now_v7().to_string()), Utc::now());
        let mut rows = self.rows.write().unwrap_or_else(|p| p.into_inner());
        rows.insert(0, item.clone());
        item
    }

    fn write_rows(&self) -> Result<RwLockWriteGuard<'_, Vec<InventoryItem>>, RemoteError> {
        self.rows
            .write()
            .map_err(|_| RemoteError::Unavailable("lock poisoned".to_string()))
    }
}

#[async_trait]
impl RemoteStore for InMemoryRemoteStore {
    async fn fetch_all(&self) -> Result<Vec<InventoryItem>, RemoteError> {
        self.enter(RemoteOp::FetchAll)?;
        let mut rows = self
            .rows
            .read()
            .map_err(|_| RemoteError::Unavailable("lock poisoned".to_string()))?
            .clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn insert(&self, items: Vec<NewItem>) -> Result<Vec<InventoryItem>, RemoteError> {
        self.enter(RemoteOp::Insert)?;
        for draft in &items {
            draft
                .validate()
                .map_err(|e| RemoteError::Validation(e.to_string()))?;
        }
        let stored: Vec<InventoryItem> = items.into_iter().map(|d| self.store_row(d)).collect();
        debug!(rows = stored.len(), "in-memory remote insert");
        self.feed.notify();
        Ok(stored)
    }

    async fn update(&self, id: &ItemId, patch: &ItemPatch) -> Result<(), RemoteError> {
        self.update_many(std::slice::from_ref(id), patch).await
    }

    async fn update_many(&self, ids: &[ItemId], patch: &ItemPatch) -> Result<(), RemoteError> {
        self.enter(RemoteOp::Update)?;
        patch
            .validate()
            .map_err(|e| RemoteError::Validation(e.to_string()))?;
        {
            let mut rows = self.write_rows()?;
            for row in rows.iter_mut().filter(|r| ids.contains(&r.id)) {
                row.apply_patch(patch);
            }
        }
        self.feed.notify();
        Ok(())
    }

    async fn delete(&self, id: &ItemId) -> Result<(), RemoteError> {
        self.enter(RemoteOp::Delete)?;
        self.write_rows()?.retain(|r| &r.id != id);
        self.feed.notify();
        Ok(())
    }

    async fn upload_blob(
        &self,
        name: &str,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<String, RemoteError> {
        self.enter(RemoteOp::UploadBlob)?;
        let mut blobs = self
            .blobs
            .write()
            .map_err(|_| RemoteError::Unavailable("lock poisoned".to_string()))?;
        if blobs.contains_key(name) {
            return Err(RemoteError::Validation(format!("blob {name} already exists")));
        }
        blobs.insert(name.to_string(), bytes);
        Ok(format!("{PUBLIC_BASE}/{name}"))
    }

    fn watch(&self, on_change: ChangeCallback) -> Result<FeedHandle, RemoteError> {
        self.enter(RemoteOp::Watch)?;
        let subscription = self.feed.subscribe(move || on_change());
        Ok(FeedHandle::new(move || drop(subscription)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn draft(brand: &str) -> NewItem {
        NewItem::available("SKU", "Queen", brand, "Nuevo", 100.0)
    }

    #[tokio::test]
    async fn insert_assigns_identity_and_fetch_orders_newest_first() {
        let store = InMemoryRemoteStore::new();
        let first = store.insert(vec![draft("A")]).await.unwrap().remove(0);
        let second = store.insert(vec![draft("B")]).await.unwrap().remove(0);
        assert_ne!(first.id, second.id);

        let all = store.fetch_all().await.unwrap();
        assert_eq!(all[0].brand, "B");
        assert_eq!(all[1].brand, "A");
    }

    #[tokio::test]
    async fn injected_fault_applies_once() {
        let store = InMemoryRemoteStore::new();
        store.fail_next(RemoteOp::FetchAll, RemoteError::Connectivity("down".into()));
        assert!(store.fetch_all().await.is_err());
        assert!(store.fetch_all().await.is_ok());
        assert_eq!(store.call_count(RemoteOp::FetchAll), 2);
    }

    #[tokio::test]
    async fn feed_fires_on_mutations_until_closed() {
        let store = InMemoryRemoteStore::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let h = hits.clone();
        let feed = store
            .watch(Arc::new(move || {
                h.fetch_add(1, Ordering::SeqCst);
            }))
            .unwrap();

        let item = store.insert(vec![draft("A")]).await.unwrap().remove(0);
        store.delete(&item.id).await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 2);

        feed.close();
        store.external_insert(draft("B"));
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn duplicate_blob_name_is_rejected() {
        let store = InMemoryRemoteStore::new();
        let url = store.upload_blob("a.jpg", vec![1, 2], "image/jpeg").await.unwrap();
        assert_eq!(url, "memory://inventory/a.jpg");
        assert!(store.upload_blob("a.jpg", vec![3], "image/jpeg").await.is_err());
        assert_eq!(store.blob("a.jpg"), Some(vec![1, 2]));
    }
}
