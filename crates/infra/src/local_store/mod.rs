//! Durable key/value slot used while the remote store is unreachable.
//!
//! The slot holds the whole collection as one JSON text value. Stores are
//! synchronous; callers never hold a store borrow across an `.await`.

mod codec;
mod file;
mod in_memory;
pub mod seed;

pub use codec::LocalCollection;
pub use file::FileLocalStore;
pub use in_memory::InMemoryLocalStore;

use std::sync::Arc;

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LocalStoreError {
    #[error("local storage I/O failed: {0}")]
    Io(String),

    #[error("local collection is corrupt: {0}")]
    Corrupt(String),
}

/// A string-keyed slot holding text values.
pub trait LocalStore: Send + Sync {
    /// `Ok(None)` when nothing has ever been written under `key`.
    fn read(&self, key: &str) -> Result<Option<String>, LocalStoreError>;

    fn write(&self, key: &str, value: &str) -> Result<(), LocalStoreError>;
}

impl<S: LocalStore + ?Sized> LocalStore for Arc<S> {
    fn read(&self, key: &str) -> Result<Option<String>, LocalStoreError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), LocalStoreError> {
        (**self).write(key, value)
    }
}
