//! Infrastructure layer: local durable storage, the hosted backend client,
//! configuration.

pub mod config;
pub mod local_store;
pub mod remote;

pub use config::{ConfigError, StoreConfig};
pub use local_store::{
    FileLocalStore, InMemoryLocalStore, LocalCollection, LocalStore, LocalStoreError,
};
pub use remote::{
    ChangeCallback, DisconnectedRemote, FeedHandle, InMemoryRemoteStore, RemoteError, RemoteOp,
    RemoteStore,
};
