#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{Duration, Utc};
use resale_auth::{Session, StaticSessionGate};
use resale_client::InventoryRepository;
use resale_core::UserId;
use resale_infra::{InMemoryLocalStore, InMemoryRemoteStore, LocalStore, RemoteError};
use resale_inventory::NewItem;

pub const LOCAL_KEY: &str = "test_inventory";

pub struct Harness {
    pub remote: Arc<InMemoryRemoteStore>,
    pub local: Arc<InMemoryLocalStore>,
    pub gate: Arc<StaticSessionGate>,
    pub repo: InventoryRepository,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_remote(InMemoryRemoteStore::new())
    }

    pub fn with_remote(remote: InMemoryRemoteStore) -> Self {
        resale_observability::init_for_tests();

        let remote = Arc::new(remote);
        let local = Arc::new(InMemoryLocalStore::new());
        let gate = Arc::new(StaticSessionGate::signed_in(session()));
        let repo = InventoryRepository::new(remote.clone(), local.clone(), LOCAL_KEY, gate.clone());

        Self {
            remote,
            local,
            gate,
            repo,
        }
    }

    /// Repository that has already dropped to offline mode, with an empty
    /// local collection (no demo seed).
    pub async fn offline() -> Self {
        let h = Self::new();
        h.local.write(LOCAL_KEY, "[]").unwrap();
        h.remote.set_outage(Some(unreachable()));
        h.repo.fetch_all().await.unwrap();
        assert!(h.repo.is_offline_mode());
        h
    }
}

pub fn session() -> Session {
    let now = Utc::now();
    Session {
        user_id: UserId::new(),
        email: Some("ops@example.com".into()),
        access_token: "token".into(),
        issued_at: now - Duration::minutes(1),
        expires_at: now + Duration::hours(1),
    }
}

pub fn unreachable() -> RemoteError {
    RemoteError::Connectivity("connection refused".into())
}

pub fn draft(brand: &str, price: f64) -> NewItem {
    NewItem::available("SKU-1", "Queen", brand, "Nuevo", price).with_location("Unit 4")
}

/// Listener that counts how often it was called.
#[derive(Clone, Default)]
pub struct Counter(Arc<AtomicUsize>);

impl Counter {
    pub fn listener(&self) -> impl Fn() + Send + Sync + 'static {
        let hits = self.0.clone();
        move || {
            hits.fetch_add(1, Ordering::SeqCst);
        }
    }

    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}
