//! Inventory domain module.
//!
//! This crate contains the inventory record model and the pure logic layered on
//! it (grouping into stacks, stack/bulk action planning, sales history, view
//! filters). No IO, no async, no storage.

pub mod filter;
pub mod grouping;
pub mod history;
pub mod item;
pub mod location;
pub mod stack;

pub use filter::{InventoryFilter, SalesSearch, location_options};
pub use grouping::{GroupKey, ItemGroup, group};
pub use history::{DashboardStats, STANDARD_SIZES, grouped_sales_history, sales_history};
pub use item::{DeliveryMethod, InventoryItem, ItemPatch, ItemStatus, NewItem};
pub use location::{FLEA_MARKET, KNOWN_LOCATIONS, is_known_location};
pub use stack::{BulkSalePlan, PlannedUpdate, SaleDetails};
