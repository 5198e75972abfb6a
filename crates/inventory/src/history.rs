//! Sales history and dashboard figures.

use crate::grouping::{ItemGroup, group};
use crate::item::{InventoryItem, ItemStatus};

/// Sizes shown on the dashboard stock breakdown, smallest first.
pub const STANDARD_SIZES: &[&str] = &["Twin", "Twin XL", "Full", "Queen", "King", "Cal King"];

/// Sold and delivered records, most recent sale first.
pub fn sales_history(items: &[InventoryItem]) -> Vec<InventoryItem> {
    let mut sold: Vec<InventoryItem> = items
        .iter()
        .filter(|i| i.status.is_sale())
        .cloned()
        .collect();
    // Stable sort: equal dates keep their input order.
    sold.sort_by(|a, b| b.sale_date().cmp(&a.sale_date()));
    sold
}

/// Sales history collapsed into stacks. Stacks are ordered by their most
/// recent sale, which is also their representative.
pub fn grouped_sales_history(items: &[InventoryItem]) -> Vec<ItemGroup> {
    group(sales_history(items))
}

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardStats {
    /// Units still for sale.
    pub available: usize,
    /// Units sold or delivered.
    pub sold: usize,
    /// Sum of the (final) prices of sold and delivered units.
    pub sold_value: f64,
    /// Available units per entry of [`STANDARD_SIZES`], in that order.
    pub stock_by_size: Vec<(&'static str, usize)>,
}

impl DashboardStats {
    pub fn compute(items: &[InventoryItem]) -> Self {
        let available = items.iter().filter(|i| i.status == ItemStatus::Available).count();
        let sold: Vec<&InventoryItem> = items.iter().filter(|i| i.status.is_sale()).collect();
        let sold_value = sold.iter().map(|i| i.price).sum();

        let stock_by_size = STANDARD_SIZES
            .iter()
            .map(|size| {
                let n = items
                    .iter()
                    .filter(|i| i.status == ItemStatus::Available && i.size == *size)
                    .count();
                (*size, n)
            })
            .collect();

        Self {
            available,
            sold: sold.len(),
            sold_value,
            stock_by_size,
        }
    }

    pub fn stock_for(&self, size: &str) -> usize {
        self.stock_by_size
            .iter()
            .find(|(s, _)| *s == size)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }
}
