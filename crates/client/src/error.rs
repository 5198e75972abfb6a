use thiserror::Error;

use resale_auth::SessionError;
use resale_core::DomainError;
use resale_infra::{LocalStoreError, RemoteError};

/// Failures surfaced by [`crate::InventoryRepository`].
///
/// Connectivity problems on reads and writes are absorbed by switching to
/// offline mode; the variants here are what is left for the caller.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("not signed in: {0}")]
    Unauthenticated(#[from] SessionError),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Only returned by `delete`, which never falls back to local storage.
    #[error("remote store unreachable: {0}")]
    Connectivity(String),

    #[error("remote store error: {0}")]
    Remote(String),

    #[error(transparent)]
    LocalStore(#[from] LocalStoreError),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl From<RemoteError> for RepositoryError {
    fn from(err: RemoteError) -> Self {
        match err {
            RemoteError::Validation(msg) => RepositoryError::Validation(msg),
            RemoteError::PermissionDenied(msg) => RepositoryError::PermissionDenied(msg),
            RemoteError::Connectivity(msg) | RemoteError::Unavailable(msg) => {
                RepositoryError::Connectivity(msg)
            }
            RemoteError::Decode(msg) | RemoteError::FeedNotStarted(msg) => {
                RepositoryError::Remote(msg)
            }
        }
    }
}

impl From<DomainError> for RepositoryError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => RepositoryError::Validation(msg),
            DomainError::InvalidId(_) => RepositoryError::Validation(err.to_string()),
        }
    }
}
