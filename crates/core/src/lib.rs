//! `resale-core`: foundation building blocks shared by every crate.
//!
//! This crate contains **pure** primitives (no IO, no async, no storage).

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::{ItemId, UserId};
