//! Offline mode state.
//!
//! The flag starts online and only ever moves to offline. A fresh repository
//! (a new app load) is the only way back online.

use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectivityState {
    /// Reads and writes go to the remote store.
    Online,
    /// Everything is served from the local slot.
    Offline,
}

#[derive(Debug, Default)]
pub struct ConnectivityMode {
    offline: AtomicBool,
}

impl ConnectivityMode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ConnectivityState {
        if self.is_offline() {
            ConnectivityState::Offline
        } else {
            ConnectivityState::Online
        }
    }

    pub fn is_offline(&self) -> bool {
        self.offline.load(Ordering::Acquire)
    }

    /// Switch to offline. Returns `true` only for the call that flipped it.
    pub fn go_offline(&self) -> bool {
        !self.offline.swap(true, Ordering::AcqRel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_online() {
        let mode = ConnectivityMode::new();
        assert_eq!(mode.state(), ConnectivityState::Online);
        assert!(!mode.is_offline());
    }

    #[test]
    fn flip_is_reported_once_and_sticks() {
        let mode = ConnectivityMode::new();
        assert!(mode.go_offline());
        assert!(!mode.go_offline());
        assert_eq!(mode.state(), ConnectivityState::Offline);
    }
}
