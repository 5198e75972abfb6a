//! List filters used by the stock and sales screens.

use std::collections::BTreeSet;

use crate::item::{InventoryItem, ItemStatus};
use crate::location::FLEA_MARKET;

/// Stock screen filter. Only available units are ever shown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryFilter {
    /// Exact size, or `None` for all sizes.
    pub size: Option<String>,
    /// Exact location, or `None` for all locations.
    pub location: Option<String>,
}

impl InventoryFilter {
    pub fn matches(&self, item: &InventoryItem) -> bool {
        if item.status != ItemStatus::Available {
            return false;
        }
        let size_ok = self.size.as_deref().is_none_or(|s| item.size == s);
        let location_ok = self
            .location
            .as_deref()
            .is_none_or(|l| item.storage_location.as_deref() == Some(l));
        size_ok && location_ok
    }

    pub fn apply(&self, items: &[InventoryItem]) -> Vec<InventoryItem> {
        items.iter().filter(|i| self.matches(i)).cloned().collect()
    }
}

/// Distinct non-blank locations of available units, sorted.
pub fn location_options(items: &[InventoryItem]) -> Vec<String> {
    items
        .iter()
        .filter(|i| i.status == ItemStatus::Available)
        .filter_map(|i| i.storage_location.as_deref())
        .filter(|l| !l.trim().is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Point-of-sale search over available units.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SalesSearch {
    /// Case-insensitive substring of brand or size. Empty matches everything.
    pub term: String,
    pub flea_market_only: bool,
}

impl SalesSearch {
    pub fn matches(&self, item: &InventoryItem) -> bool {
        if item.status != ItemStatus::Available {
            return false;
        }
        if self.flea_market_only && item.storage_location.as_deref() != Some(FLEA_MARKET) {
            return false;
        }
        if self.term.is_empty() {
            return true;
        }
        let term = self.term.to_lowercase();
        item.brand.to_lowercase().contains(&term) || item.size.to_lowercase().contains(&term)
    }

    pub fn apply(&self, items: &[InventoryItem]) -> Vec<InventoryItem> {
        items.iter().filter(|i| self.matches(i)).cloned().collect()
    }
}
