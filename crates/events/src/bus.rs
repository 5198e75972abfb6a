//! Subscription mechanics (observer list + disposer).
//!
//! This module provides the **observer pattern** used to tell every mounted
//! list view that the inventory collection changed.
//!
//! ## Design Philosophy
//!
//! - **Content-free**: a signal carries nothing; receivers re-read the whole
//!   collection. There is no per-field diffing.
//! - **At-least-once**: the same change may be signalled twice (for example
//!   once by the local write path and once by the remote change feed).
//!   Receivers must treat a signal as idempotent.
//! - **Owned, not ambient**: each notifier is an explicit object owned by the
//!   repository instance; there is no process-global event name.
//!
//! ## Disposal
//!
//! Every registration returns a [`Subscription`]. Calling
//! [`Subscription::unsubscribe`] (or dropping it) removes exactly that
//! registration and nothing else.

use std::sync::{Arc, Mutex, Weak};

/// Callback invoked on every change signal.
pub type Listener = Arc<dyn Fn() + Send + Sync>;

pub(crate) type ListenerId = u64;

#[derive(Default)]
pub(crate) struct Registry {
    pub(crate) next_id: ListenerId,
    pub(crate) listeners: Vec<(ListenerId, Listener)>,
}

/// Handle to one registration on a [`crate::ChangeNotifier`].
///
/// Dropping the handle detaches the listener. Keep it alive for as long as the
/// view is mounted.
#[must_use = "dropping a Subscription immediately detaches its listener"]
pub struct Subscription {
    id: ListenerId,
    registry: Weak<Mutex<Registry>>,
}

impl Subscription {
    pub(crate) fn new(id: ListenerId, registry: &Arc<Mutex<Registry>>) -> Self {
        Self {
            id,
            registry: Arc::downgrade(registry),
        }
    }

    /// Detach this listener. Other listeners are untouched.
    pub fn unsubscribe(self) {
        // Drop does the work.
    }

    fn detach(&self) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        let removed = {
            let mut registry = registry.lock().unwrap_or_else(|p| p.into_inner());
            registry
                .listeners
                .iter()
                .position(|(id, _)| *id == self.id)
                .map(|idx| registry.listeners.remove(idx))
        };
        // The listener may own other subscriptions; release it outside the lock.
        drop(removed);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.detach();
    }
}

impl core::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
