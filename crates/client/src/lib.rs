//! `resale-client`
//!
//! **Responsibility:** the inventory repository used by every view of the
//! resale app.
//!
//! This crate provides:
//! - One data-access surface over the hosted backend and a local slot
//! - Automatic, sticky fallback to offline mode when the backend is unreachable
//! - Payload-free change notifications for list views
//! - Stack and bulk actions executed through the repository

pub mod app;
pub mod error;
pub mod offline;
pub mod repository;
pub mod stack;

pub use app::build_repository;
pub use error::{RepositoryError, RepositoryResult};
pub use offline::{ConnectivityMode, ConnectivityState};
pub use repository::{ImageBlob, InventoryRepository, InventorySubscription};
pub use stack::StackActions;
