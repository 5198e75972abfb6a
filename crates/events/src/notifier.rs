//! In-process change notifier.

use std::sync::{Arc, Mutex};

use crate::bus::{Listener, Registry, Subscription};

/// Observer list broadcasting payload-free change signals.
///
/// - No IO / no async
/// - Listeners run synchronously on the notifying task, outside the lock, so
///   a listener may subscribe or unsubscribe while being notified
#[derive(Clone, Default)]
pub struct ChangeNotifier {
    registry: Arc<Mutex<Registry>>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. The returned handle is its disposer.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        let mut registry = self.registry.lock().unwrap_or_else(|p| p.into_inner());
        let id = registry.next_id;
        registry.next_id += 1;
        registry.listeners.push((id, Arc::new(listener)));
        drop(registry);

        Subscription::new(id, &self.registry)
    }

    /// Signal every current listener once.
    pub fn notify(&self) {
        let listeners: Vec<Listener> = {
            let registry = self.registry.lock().unwrap_or_else(|p| p.into_inner());
            registry.listeners.iter().map(|(_, l)| l.clone()).collect()
        };

        tracing::debug!(listeners = listeners.len(), "broadcasting inventory change");

        for listener in listeners {
            listener();
        }
    }

    /// Number of attached listeners.
    pub fn listener_count(&self) -> usize {
        self.registry
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .listeners
            .len()
    }
}

impl core::fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("listeners", &self.listener_count())
            .finish()
    }
}
