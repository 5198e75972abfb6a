//! The hosted backend: a table of inventory rows, a public blob bucket and a
//! change feed.

mod disconnected;
mod in_memory;
#[cfg(feature = "rest")]
mod rest;
mod store;

pub use disconnected::DisconnectedRemote;
pub use in_memory::{InMemoryRemoteStore, RemoteOp};
#[cfg(feature = "rest")]
pub use rest::{RestRemoteStore, TokenSource};
pub use store::{ChangeCallback, FeedHandle, RemoteError, RemoteStore};
