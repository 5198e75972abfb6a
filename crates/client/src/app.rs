//! Wiring a repository from [`StoreConfig`].

use std::sync::Arc;

use tracing::info;

use resale_auth::SessionGate;
use resale_infra::{DisconnectedRemote, FileLocalStore, RemoteStore, StoreConfig};

use crate::repository::InventoryRepository;

/// Build the repository the app runs with.
///
/// With a configured backend (and the `rest` feature) rows go to the hosted
/// table; otherwise the repository starts against [`DisconnectedRemote`] and
/// drops to the local slot on first use.
pub fn build_repository(
    config: &StoreConfig,
    sessions: Arc<dyn SessionGate>,
) -> anyhow::Result<InventoryRepository> {
    let remote = remote_from_config(config, sessions.clone())?;
    let local = Arc::new(FileLocalStore::from_config(config));
    info!(data_dir = %local.dir().display(), "local inventory slot ready");

    Ok(InventoryRepository::new(
        remote,
        local,
        config.local_key.clone(),
        sessions,
    ))
}

#[cfg(feature = "rest")]
fn remote_from_config(
    config: &StoreConfig,
    sessions: Arc<dyn SessionGate>,
) -> anyhow::Result<Arc<dyn RemoteStore>> {
    use anyhow::Context;
    use resale_infra::remote::RestRemoteStore;

    if !config.has_remote() {
        tracing::warn!("no remote store configured; running offline");
        return Ok(Arc::new(DisconnectedRemote));
    }
    let rest = RestRemoteStore::from_config(config)
        .context("configuring the remote store client")?
        .with_token_source(Arc::new(move || {
            sessions.current().map(|s| s.access_token)
        }));
    Ok(Arc::new(rest))
}

#[cfg(not(feature = "rest"))]
fn remote_from_config(
    config: &StoreConfig,
    _sessions: Arc<dyn SessionGate>,
) -> anyhow::Result<Arc<dyn RemoteStore>> {
    if config.has_remote() {
        tracing::warn!("remote store configured but the rest feature is disabled; running offline");
    }
    Ok(Arc::new(DisconnectedRemote))
}
