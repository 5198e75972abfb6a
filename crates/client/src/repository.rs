//! The inventory repository.
//!
//! Every read and write of the inventory collection goes through
//! [`InventoryRepository`]. It talks to the remote store while it can and
//! switches to the local slot, for the rest of its lifetime, the first time
//! the remote store is unreachable.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use resale_auth::SessionGate;
use resale_core::ItemId;
use resale_events::{ChangeNotifier, Subscription};
use resale_infra::local_store::seed::{demo_drafts, demo_items};
use resale_infra::{FeedHandle, LocalCollection, LocalStore, RemoteError, RemoteStore};
use resale_inventory::{InventoryItem, ItemPatch, NewItem};

use crate::error::{RepositoryError, RepositoryResult};
use crate::offline::{ConnectivityMode, ConnectivityState};

/// Raw photo bytes plus their MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBlob {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

impl ImageBlob {
    pub fn jpeg(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            content_type: "image/jpeg".to_string(),
        }
    }

    fn extension(&self) -> &'static str {
        match self.content_type.as_str() {
            "image/png" => "png",
            "image/webp" => "webp",
            _ => "jpg",
        }
    }
}

/// Handle returned by [`InventoryRepository::subscribe`].
///
/// Dropping it (or calling [`InventorySubscription::unsubscribe`]) detaches
/// the local listener and closes the remote change feed, if one was opened.
#[must_use = "dropping an InventorySubscription immediately detaches it"]
#[derive(Debug)]
pub struct InventorySubscription {
    _local: Subscription,
    feed: Option<FeedHandle>,
}

impl InventorySubscription {
    pub fn has_remote_feed(&self) -> bool {
        self.feed.is_some()
    }

    pub fn unsubscribe(self) {}
}

pub struct InventoryRepository {
    remote: Arc<dyn RemoteStore>,
    local: LocalCollection,
    sessions: Arc<dyn SessionGate>,
    mode: ConnectivityMode,
    notifier: ChangeNotifier,
}

impl InventoryRepository {
    pub fn new(
        remote: Arc<dyn RemoteStore>,
        local: Arc<dyn LocalStore>,
        local_key: impl Into<String>,
        sessions: Arc<dyn SessionGate>,
    ) -> Self {
        Self {
            remote,
            local: LocalCollection::new(local, local_key),
            sessions,
            mode: ConnectivityMode::new(),
            notifier: ChangeNotifier::new(),
        }
    }

    pub fn is_offline_mode(&self) -> bool {
        self.mode.is_offline()
    }

    pub fn connectivity(&self) -> ConnectivityState {
        self.mode.state()
    }

    /// The whole collection, newest first.
    ///
    /// Remote failures of any kind switch to offline mode and are answered
    /// from the local slot. An empty slot is seeded with demo data.
    pub async fn fetch_all(&self) -> RepositoryResult<Vec<InventoryItem>> {
        self.authorize()?;

        if !self.mode.is_offline() {
            match self.remote.fetch_all().await {
                Ok(items) => {
                    debug!(records = items.len(), "loaded inventory from remote store");
                    return Ok(items);
                }
                Err(err) => self.go_offline("fetch_all", &err),
            }
        }

        let mut items = self.local.load_or_seed(Utc::now())?;
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }

    /// Store a new record and return it with its assigned id and timestamp.
    pub async fn add(&self, draft: NewItem) -> RepositoryResult<InventoryItem> {
        self.authorize()?;
        draft.validate()?;

        if !self.mode.is_offline() {
            match self.remote.insert(vec![draft.clone()]).await {
                Ok(mut rows) => {
                    let item = rows.pop().ok_or_else(|| {
                        RepositoryError::Remote("insert acknowledged no row".to_string())
                    })?;
                    info!(item_id = %item.id, "item added");
                    self.notifier.notify();
                    return Ok(item);
                }
                Err(err) if err.is_connectivity() => self.go_offline("add", &err),
                Err(err @ RemoteError::Decode(_)) => {
                    // The row may already be stored.
                    warn!(error = %err, "insert acknowledgement unreadable");
                    self.notifier.notify();
                    return Err(err.into());
                }
                Err(err) => return Err(err.into()),
            }
        }

        let now = Utc::now();
        let item = draft.into_item(ItemId::generate_local(), now);
        let stored = item.clone();
        self.local.mutate(now, move |items| items.insert(0, stored))?;
        info!(item_id = %item.id, "item added locally");
        self.notifier.notify();
        Ok(item)
    }

    /// Merge `patch` into the record with `id`. Unknown ids and empty patches
    /// are a no-op.
    pub async fn update(&self, id: &ItemId, patch: &ItemPatch) -> RepositoryResult<()> {
        self.authorize()?;
        patch.validate()?;
        if patch.is_empty() {
            return Ok(());
        }

        if !self.mode.is_offline() {
            match self.remote.update(id, patch).await {
                Ok(()) => {
                    debug!(item_id = %id, "item updated");
                    self.notifier.notify();
                    return Ok(());
                }
                Err(err) if err.is_connectivity() => self.go_offline("update", &err),
                Err(err) => return Err(err.into()),
            }
        }

        self.local.mutate(Utc::now(), |items| {
            if let Some(item) = items.iter_mut().find(|i| &i.id == id) {
                item.apply_patch(patch);
            }
        })?;
        self.notifier.notify();
        Ok(())
    }

    /// Merge `patch` into every listed record that exists.
    pub async fn bulk_update(&self, ids: &[ItemId], patch: &ItemPatch) -> RepositoryResult<()> {
        self.authorize()?;
        patch.validate()?;
        if ids.is_empty() || patch.is_empty() {
            return Ok(());
        }

        if !self.mode.is_offline() {
            match self.remote.update_many(ids, patch).await {
                Ok(()) => {
                    debug!(records = ids.len(), "items updated");
                    self.notifier.notify();
                    return Ok(());
                }
                Err(err) if err.is_connectivity() => self.go_offline("bulk_update", &err),
                Err(err) => return Err(err.into()),
            }
        }

        self.local.mutate(Utc::now(), |items| {
            for item in items.iter_mut().filter(|i| ids.contains(&i.id)) {
                item.apply_patch(patch);
            }
        })?;
        self.notifier.notify();
        Ok(())
    }

    /// Remove a record permanently.
    ///
    /// Unlike the other writes, a remote failure is returned to the caller
    /// and the record stays where it was. An unreachable remote still flips
    /// the repository to offline mode for later calls.
    pub async fn delete(&self, id: &ItemId) -> RepositoryResult<()> {
        self.authorize()?;

        if !self.mode.is_offline() {
            return match self.remote.delete(id).await {
                Ok(()) => {
                    info!(item_id = %id, "item deleted");
                    self.notifier.notify();
                    Ok(())
                }
                Err(err) => {
                    warn!(item_id = %id, error = %err, "remote delete failed");
                    if err.is_connectivity() {
                        self.go_offline("delete", &err);
                    }
                    Err(err.into())
                }
            };
        }

        self.local.mutate(Utc::now(), |items| items.retain(|i| &i.id != id))?;
        info!(item_id = %id, "item deleted locally");
        self.notifier.notify();
        Ok(())
    }

    /// Upload a photo and return its public URL.
    ///
    /// `None` while offline or when the blob store refuses the upload; the
    /// connectivity mode is left unchanged either way.
    pub async fn upload_image(&self, blob: ImageBlob) -> RepositoryResult<Option<String>> {
        self.authorize()?;
        if self.mode.is_offline() {
            return Ok(None);
        }

        let name = blob_name(blob.extension());
        match self
            .remote
            .upload_blob(&name, blob.bytes, &blob.content_type)
            .await
        {
            Ok(url) => {
                debug!(blob = %name, "image uploaded");
                Ok(Some(url))
            }
            Err(err) => {
                warn!(blob = %name, error = %err, "image upload failed");
                Ok(None)
            }
        }
    }

    /// Call `on_change` after every mutation made through this repository
    /// and, while online, every change reported by the remote change feed.
    ///
    /// A subscription made while offline never attaches to the remote feed.
    pub fn subscribe<F>(&self, on_change: F) -> RepositoryResult<InventorySubscription>
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.authorize()?;
        let listener: Arc<dyn Fn() + Send + Sync> = Arc::new(on_change);

        let local = {
            let listener = listener.clone();
            self.notifier.subscribe(move || listener())
        };

        let feed = if self.mode.is_offline() {
            None
        } else {
            match self.remote.watch(listener) {
                Ok(handle) => Some(handle),
                Err(err) => {
                    if err.is_connectivity() {
                        self.go_offline("subscribe", &err);
                    } else {
                        warn!(error = %err, "remote change feed refused");
                    }
                    None
                }
            }
        };

        Ok(InventorySubscription {
            _local: local,
            feed,
        })
    }

    /// Write the demo dataset: overwrite the local slot when offline, insert
    /// it remotely otherwise.
    pub async fn seed_demo(&self) -> RepositoryResult<()> {
        self.authorize()?;

        if !self.mode.is_offline() {
            match self.remote.insert(demo_drafts()).await {
                Ok(rows) => {
                    info!(records = rows.len(), "seeded remote store with demo data");
                    self.notifier.notify();
                    return Ok(());
                }
                Err(err) if err.is_connectivity() => self.go_offline("seed_demo", &err),
                Err(err) => return Err(err.into()),
            }
        }

        self.local.replace(&demo_items(Utc::now()))?;
        info!("seeded local slot with demo data");
        self.notifier.notify();
        Ok(())
    }

    fn authorize(&self) -> RepositoryResult<()> {
        self.sessions.require(Utc::now())?;
        Ok(())
    }

    fn go_offline(&self, operation: &'static str, err: &RemoteError) {
        if self.mode.go_offline() {
            warn!(operation, error = %err, "remote store failed; switching to offline mode");
        }
    }
}

/// `<unix millis>-<7 random chars>.<ext>`
fn blob_name(extension: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!(
        "{}-{}.{}",
        Utc::now().timestamp_millis(),
        &suffix[..7],
        extension
    )
}

impl core::fmt::Debug for InventoryRepository {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("InventoryRepository")
            .field("local", &self.local)
            .field("mode", &self.mode.state())
            .field("subscribers", &self.notifier.listener_count())
            .finish_non_exhaustive()
    }
}
