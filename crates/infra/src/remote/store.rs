use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use resale_core::ItemId;
use resale_inventory::{InventoryItem, ItemPatch, NewItem};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RemoteError {
    /// The backend could not be reached at all.
    #[error("remote unreachable: {0}")]
    Connectivity(String),

    /// The backend answered but is not serving requests.
    #[error("remote unavailable: {0}")]
    Unavailable(String),

    #[error("remote rejected the data: {0}")]
    Validation(String),

    #[error("remote denied access: {0}")]
    PermissionDenied(String),

    #[error("remote response could not be decoded: {0}")]
    Decode(String),

    /// The change feed could not be started locally (e.g. no async runtime).
    #[error("change feed not started: {0}")]
    FeedNotStarted(String),
}

impl RemoteError {
    /// Failures that warrant switching to local storage.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, RemoteError::Connectivity(_) | RemoteError::Unavailable(_))
    }
}

/// Called whenever the backend reports any insert, update or delete on the
/// inventory table, including changes made by other clients.
pub type ChangeCallback = Arc<dyn Fn() + Send + Sync>;

/// Live change-feed registration. Dropping it closes the feed.
#[must_use = "dropping a FeedHandle immediately closes the change feed"]
pub struct FeedHandle {
    close: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl FeedHandle {
    pub fn new(close: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            close: Some(Box::new(close)),
        }
    }

    pub fn close(mut self) {
        self.run_close();
    }

    fn run_close(&mut self) {
        if let Some(close) = self.close.take() {
            close();
        }
    }
}

impl Drop for FeedHandle {
    fn drop(&mut self) {
        self.run_close();
    }
}

impl core::fmt::Debug for FeedHandle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FeedHandle")
            .field("open", &self.close.is_some())
            .finish()
    }
}

/// Hosted storage for inventory rows and item photos.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Every row, newest `created_at` first.
    async fn fetch_all(&self) -> Result<Vec<InventoryItem>, RemoteError>;

    /// Insert rows; the backend assigns `id` and `created_at` and returns the
    /// stored rows.
    async fn insert(&self, items: Vec<NewItem>) -> Result<Vec<InventoryItem>, RemoteError>;

    /// Merge `patch` into the row with `id`. An unknown id is not an error.
    async fn update(&self, id: &ItemId, patch: &ItemPatch) -> Result<(), RemoteError>;

    /// Merge `patch` into every row whose id is listed.
    async fn update_many(&self, ids: &[ItemId], patch: &ItemPatch) -> Result<(), RemoteError>;

    async fn delete(&self, id: &ItemId) -> Result<(), RemoteError>;

    /// Store `bytes` under `name` in the public bucket and return its URL.
    async fn upload_blob(
        &self,
        name: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, RemoteError>;

    /// Open a change feed that calls `on_change` for every table change.
    fn watch(&self, on_change: ChangeCallback) -> Result<FeedHandle, RemoteError>;
}
