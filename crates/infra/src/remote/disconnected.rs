use async_trait::async_trait;

use resale_core::ItemId;
use resale_inventory::{InventoryItem, ItemPatch, NewItem};

use super::{ChangeCallback, FeedHandle, RemoteError, RemoteStore};

/// Stand-in used when no backend is configured. Every call fails with a
/// connectivity error, so the repository drops to offline mode on first use.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisconnectedRemote;

fn unreachable() -> RemoteError {
    RemoteError::Connectivity("no remote store configured".to_string())
}

#[async_trait]
impl RemoteStore for DisconnectedRemote {
    async fn fetch_all(&self) -> Result<Vec<InventoryItem>, RemoteError> {
        Err(unreachable())
    }

    async fn insert(&self, _items: Vec<NewItem>) -> Result<Vec<InventoryItem>, RemoteError> {
        Err(unreachable())
    }

    async fn update(&self, _id: &ItemId, _patch: &ItemPatch) -> Result<(), RemoteError> {
        Err(unreachable())
    }

    async fn update_many(&self, _ids: &[ItemId], _patch: &ItemPatch) -> Result<(), RemoteError> {
        Err(unreachable())
    }

    async fn delete(&self, _id: &ItemId) -> Result<(), RemoteError> {
        Err(unreachable())
    }

    async fn upload_blob(
        &self,
        _name: &str,
        _bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<String, RemoteError> {
        Err(unreachable())
    }

    fn watch(&self, _on_change: ChangeCallback) -> Result<FeedHandle, RemoteError> {
        Err(unreachable())
    }
}
