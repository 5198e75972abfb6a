mod common;

use std::sync::Arc;

use common::{Counter, Harness, LOCAL_KEY, draft, unreachable};
use resale_auth::StaticSessionGate;
use resale_client::{ConnectivityState, InventoryRepository, RepositoryError, build_repository};
use resale_core::ItemId;
use resale_infra::{
    DisconnectedRemote, FileLocalStore, InMemoryLocalStore, LocalStore, RemoteError, RemoteOp,
    StoreConfig,
};
use resale_inventory::ItemPatch;

#[tokio::test]
async fn fetch_failure_falls_back_to_seeded_local_data() {
    let h = Harness::new();
    h.remote.fail_next(RemoteOp::FetchAll, unreachable());

    let items = h.repo.fetch_all().await.unwrap();

    assert!(h.repo.is_offline_mode());
    let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids.len(), 4);
    assert!(ids.contains(&"demo-1"));
    // demo-2 was created a day earlier, so it sorts last.
    assert_eq!(ids[3], "demo-2");
    assert!(h.local.read(LOCAL_KEY).unwrap().is_some());
}

#[tokio::test]
async fn any_fetch_error_switches_to_offline() {
    let h = Harness::new();
    h.remote
        .fail_next(RemoteOp::FetchAll, RemoteError::PermissionDenied("rls".into()));

    assert!(h.repo.fetch_all().await.is_ok());
    assert!(h.repo.is_offline_mode());
}

#[tokio::test]
async fn offline_mode_never_returns_online() {
    let h = Harness::new();
    h.remote.fail_next(RemoteOp::FetchAll, unreachable());
    h.repo.fetch_all().await.unwrap();
    assert_eq!(h.repo.connectivity(), ConnectivityState::Offline);

    // Remote is healthy again, but this instance stays local.
    h.repo.add(draft("Casper", 100.0)).await.unwrap();
    h.repo.fetch_all().await.unwrap();

    assert!(h.repo.is_offline_mode());
    assert_eq!(h.remote.call_count(RemoteOp::FetchAll), 1);
    assert_eq!(h.remote.call_count(RemoteOp::Insert), 0);
    assert!(h.remote.rows().is_empty());
}

#[tokio::test]
async fn add_retries_locally_after_connectivity_failure() {
    let h = Harness::new();
    h.local.write(LOCAL_KEY, "[]").unwrap();
    h.remote.fail_next(RemoteOp::Insert, unreachable());

    let item = h.repo.add(draft("Casper", 100.0)).await.unwrap();

    assert!(h.repo.is_offline_mode());
    let items = h.repo.fetch_all().await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, item.id);
    assert!(h.remote.rows().is_empty());
}

#[tokio::test]
async fn unavailable_backend_counts_as_connectivity() {
    let h = Harness::new();
    h.local.write(LOCAL_KEY, "[]").unwrap();
    h.remote
        .fail_next(RemoteOp::Update, RemoteError::Unavailable("503".into()));

    h.repo
        .update(&ItemId::new("x"), &ItemPatch::new().price(5.0))
        .await
        .unwrap();
    assert!(h.repo.is_offline_mode());
}

#[tokio::test]
async fn local_ids_are_unique_and_not_demo_ids() {
    let h = Harness::offline().await;
    let a = h.repo.add(draft("A", 1.0)).await.unwrap();
    let b = h.repo.add(draft("B", 1.0)).await.unwrap();

    assert_ne!(a.id, b.id);
    assert!(!a.id.as_str().starts_with("demo-"));
}

#[tokio::test]
async fn offline_update_merges_into_local_copy() {
    let h = Harness::offline().await;
    let item = h.repo.add(draft("Casper", 100.0)).await.unwrap();

    h.repo
        .update(&item.id, &ItemPatch::new().price(80.0))
        .await
        .unwrap();
    h.repo
        .update(&ItemId::new("missing"), &ItemPatch::new().price(1.0))
        .await
        .unwrap();

    let items = h.repo.fetch_all().await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].price, 80.0);
    assert_eq!(items[0].brand, "Casper");
}

#[tokio::test]
async fn offline_delete_removes_and_repeat_is_ok() {
    let h = Harness::offline().await;
    let item = h.repo.add(draft("Casper", 100.0)).await.unwrap();

    h.repo.delete(&item.id).await.unwrap();
    h.repo.delete(&item.id).await.unwrap();

    assert!(h.repo.fetch_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn emptied_collection_is_not_reseeded() {
    let h = Harness::new();
    h.remote.fail_next(RemoteOp::FetchAll, unreachable());
    for item in h.repo.fetch_all().await.unwrap() {
        h.repo.delete(&item.id).await.unwrap();
    }

    assert!(h.repo.fetch_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_connectivity_failure_is_surfaced_and_flips_mode() {
    let h = Harness::new();
    let item = h.repo.add(draft("Casper", 100.0)).await.unwrap();
    h.remote.fail_next(RemoteOp::Delete, unreachable());

    let err = h.repo.delete(&item.id).await.unwrap_err();

    assert!(matches!(err, RepositoryError::Connectivity(_)));
    assert!(h.repo.is_offline_mode());
    assert_eq!(h.remote.rows().len(), 1);
}

#[tokio::test]
async fn offline_upload_yields_none_without_touching_remote() {
    let h = Harness::offline().await;

    let url = h
        .repo
        .upload_image(resale_client::ImageBlob::jpeg(vec![1, 2, 3]))
        .await
        .unwrap();

    assert_eq!(url, None);
    assert_eq!(h.remote.call_count(RemoteOp::UploadBlob), 0);
}

#[tokio::test]
async fn offline_subscription_only_hears_local_writes() {
    let h = Harness::offline().await;
    let hits = Counter::default();
    let sub = h.repo.subscribe(hits.listener()).unwrap();
    assert!(!sub.has_remote_feed());

    h.repo.add(draft("Casper", 100.0)).await.unwrap();
    assert_eq!(hits.get(), 1);

    h.remote.set_outage(None);
    h.remote.external_insert(draft("Elsewhere", 1.0));
    assert_eq!(hits.get(), 1);
}

#[tokio::test]
async fn seed_demo_offline_overwrites_local_slot() {
    let h = Harness::offline().await;
    h.repo.add(draft("Casper", 100.0)).await.unwrap();

    h.repo.seed_demo().await.unwrap();

    let items = h.repo.fetch_all().await.unwrap();
    assert_eq!(items.len(), 4);
    assert!(items.iter().all(|i| i.id.as_str().starts_with("demo-")));
}

#[tokio::test]
async fn corrupt_local_slot_is_reported() {
    let h = Harness::offline().await;
    h.local.write(LOCAL_KEY, "not json").unwrap();

    assert!(matches!(
        h.repo.fetch_all().await,
        Err(RepositoryError::LocalStore(_))
    ));
}

#[tokio::test]
async fn unconfigured_remote_runs_from_local_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig {
        data_dir: dir.path().to_path_buf(),
        ..StoreConfig::default()
    };
    let gate = Arc::new(StaticSessionGate::signed_in(common::session()));

    let repo = build_repository(&config, gate.clone()).unwrap();
    let item = repo.add(draft("Casper", 100.0)).await.unwrap();
    assert!(repo.is_offline_mode());

    // A fresh instance over the same file sees the write.
    let reopened = InventoryRepository::new(
        Arc::new(DisconnectedRemote),
        Arc::new(FileLocalStore::new(dir.path())),
        config.local_key.clone(),
        gate,
    );
    let items = reopened.fetch_all().await.unwrap();
    assert!(items.iter().any(|i| i.id == item.id));
}

#[tokio::test]
async fn fresh_instance_starts_online_again() {
    let remote = Arc::new(resale_infra::InMemoryRemoteStore::new());
    let local = Arc::new(InMemoryLocalStore::new());
    let gate = Arc::new(StaticSessionGate::signed_in(common::session()));

    let first = InventoryRepository::new(remote.clone(), local.clone(), LOCAL_KEY, gate.clone());
    remote.fail_next(RemoteOp::FetchAll, unreachable());
    first.fetch_all().await.unwrap();
    assert!(first.is_offline_mode());

    let second = InventoryRepository::new(remote, local, LOCAL_KEY, gate);
    assert!(!second.is_offline_mode());
    assert!(second.fetch_all().await.unwrap().is_empty());
    assert!(!second.is_offline_mode());
}
