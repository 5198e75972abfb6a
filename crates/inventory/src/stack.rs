//! Stack- and selection-scoped actions, planned as storage mutations.
//!
//! Stack actions ("sell one", "move one", "delete one") always target the
//! representative of the stack: the operator chooses how many units remain,
//! never which physical unit is affected. Selection actions take an explicit
//! id set that may span many stacks.
//!
//! Planning is pure; executing a plan is the repository's job.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use resale_core::{DomainError, DomainResult, ItemId};

use crate::grouping::ItemGroup;
use crate::item::{DeliveryMethod, InventoryItem, ItemPatch, ItemStatus};

/// Customer and delivery details captured at the point of sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleDetails {
    pub customer_name: String,
    pub customer_phone: String,
    pub delivery_method: DeliveryMethod,
    #[serde(default)]
    pub delivery_address: String,
    /// Negotiated price. `None` keeps the listed price.
    #[serde(default)]
    pub sale_price: Option<f64>,
}

impl SaleDetails {
    pub fn pickup(customer_name: impl Into<String>, customer_phone: impl Into<String>) -> Self {
        Self {
            customer_name: customer_name.into(),
            customer_phone: customer_phone.into(),
            delivery_method: DeliveryMethod::Pickup,
            delivery_address: String::new(),
            sale_price: None,
        }
    }

    pub fn delivered_to(mut self, address: impl Into<String>) -> Self {
        self.delivery_method = DeliveryMethod::Delivery;
        self.delivery_address = address.into();
        self
    }

    pub fn at_price(mut self, price: f64) -> Self {
        self.sale_price = Some(price);
        self
    }

    /// Sale fields without a price.
    fn base_patch(&self, sold_at: DateTime<Utc>) -> ItemPatch {
        ItemPatch {
            status: Some(ItemStatus::Sold),
            customer_name: Some(self.customer_name.clone()),
            customer_phone: Some(self.customer_phone.clone()),
            delivery_method: Some(self.delivery_method),
            delivery_address: Some(self.delivery_address.clone()),
            sold_at: Some(sold_at),
            ..ItemPatch::default()
        }
    }

    /// The negotiated price if it is usable, otherwise `listed`.
    fn effective_price(&self, listed: f64) -> f64 {
        match self.sale_price {
            Some(p) if p.is_finite() && p >= 0.0 => p,
            _ => listed,
        }
    }
}

/// One `update(id, patch)` to perform.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedUpdate {
    pub id: ItemId,
    pub patch: ItemPatch,
}

/// Sell the representative unit of a stack.
pub fn sell_one(group: &ItemGroup, sale: &SaleDetails, sold_at: DateTime<Utc>) -> PlannedUpdate {
    let target = group.representative();
    let mut patch = sale.base_patch(sold_at);
    patch.price = Some(sale.effective_price(target.price));
    PlannedUpdate {
        id: target.id.clone(),
        patch,
    }
}

pub fn mark_delivered_one(group: &ItemGroup) -> PlannedUpdate {
    PlannedUpdate {
        id: group.representative().id.clone(),
        patch: ItemPatch::new().status(ItemStatus::Delivered),
    }
}

pub fn move_one(group: &ItemGroup, location: impl Into<String>) -> PlannedUpdate {
    PlannedUpdate {
        id: group.representative().id.clone(),
        patch: ItemPatch::new().storage_location(location),
    }
}

pub fn delete_one(group: &ItemGroup) -> ItemId {
    group.representative().id.clone()
}

/// How a selection-scoped sale is written.
#[derive(Debug, Clone, PartialEq)]
pub enum BulkSalePlan {
    /// Same patch for every id; prices untouched.
    Uniform { ids: Vec<ItemId>, patch: ItemPatch },
    /// One update per record because each gets its own rescaled price.
    PerItem(Vec<PlannedUpdate>),
}

/// Plan a sale of every record in `selected`.
///
/// With `custom_total`, each price is rescaled by `custom_total / old_total`
/// and rounded to whole currency units independently, so the rounded prices
/// may not add up to exactly `custom_total`.
pub fn plan_bulk_sale(
    selected: &[InventoryItem],
    sale: &SaleDetails,
    custom_total: Option<f64>,
    sold_at: DateTime<Utc>,
) -> DomainResult<BulkSalePlan> {
    let base = sale.base_patch(sold_at);

    let Some(total) = custom_total else {
        return Ok(BulkSalePlan::Uniform {
            ids: selected.iter().map(|i| i.id.clone()).collect(),
            patch: base,
        });
    };

    let prices = redistribute_total(selected, total)?;
    let updates = prices
        .into_iter()
        .map(|(id, price)| {
            let mut patch = base.clone();
            patch.price = Some(price);
            PlannedUpdate { id, patch }
        })
        .collect();

    Ok(BulkSalePlan::PerItem(updates))
}

/// Scale each record's price so the selection sells for roughly `new_total`.
///
/// When the current prices sum to zero the total is split evenly.
pub fn redistribute_total(
    selected: &[InventoryItem],
    new_total: f64,
) -> DomainResult<Vec<(ItemId, f64)>> {
    if !new_total.is_finite() || new_total < 0.0 {
        return Err(DomainError::validation("sale total must be a non-negative number"));
    }
    if selected.is_empty() {
        return Ok(Vec::new());
    }

    let old_total: f64 = selected.iter().map(|i| i.price).sum();

    let prices = if old_total > 0.0 {
        let ratio = new_total / old_total;
        selected
            .iter()
            .map(|i| (i.id.clone(), (i.price * ratio).round()))
            .collect()
    } else {
        let share = (new_total / selected.len() as f64).round();
        selected.iter().map(|i| (i.id.clone(), share)).collect()
    };

    Ok(prices)
}

/// Every id of the stack, for toggling it in a selection.
pub fn select_ids(group: &ItemGroup) -> Vec<ItemId> {
    group.ids()
}
