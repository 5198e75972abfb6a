//! Stack and selection actions, executed through the repository.
//!
//! The planning lives in `resale_inventory::stack`; this module only turns
//! plans into repository calls.

use chrono::Utc;

use resale_core::ItemId;
use resale_inventory::stack::{self, BulkSalePlan, PlannedUpdate, SaleDetails};
use resale_inventory::{InventoryItem, ItemGroup, ItemPatch};

use crate::error::RepositoryResult;
use crate::repository::InventoryRepository;

#[derive(Debug, Clone, Copy)]
pub struct StackActions<'a> {
    repo: &'a InventoryRepository,
}

impl InventoryRepository {
    pub fn stack_actions(&self) -> StackActions<'_> {
        StackActions { repo: self }
    }
}

impl<'a> StackActions<'a> {
    /// Sell one unit from the stack. Returns the id that was sold.
    pub async fn sell_one(
        &self,
        group: &ItemGroup,
        sale: &SaleDetails,
    ) -> RepositoryResult<ItemId> {
        let planned = stack::sell_one(group, sale, Utc::now());
        self.apply(planned).await
    }

    pub async fn mark_delivered_one(&self, group: &ItemGroup) -> RepositoryResult<ItemId> {
        self.apply(stack::mark_delivered_one(group)).await
    }

    pub async fn move_one(
        &self,
        group: &ItemGroup,
        location: impl Into<String>,
    ) -> RepositoryResult<ItemId> {
        self.apply(stack::move_one(group, location)).await
    }

    pub async fn delete_one(&self, group: &ItemGroup) -> RepositoryResult<ItemId> {
        let id = stack::delete_one(group);
        self.repo.delete(&id).await?;
        Ok(id)
    }

    pub async fn bulk_move(
        &self,
        ids: &[ItemId],
        location: impl Into<String>,
    ) -> RepositoryResult<()> {
        let patch = ItemPatch::new().storage_location(location);
        self.repo.bulk_update(ids, &patch).await
    }

    /// Sell every selected record, optionally rescaling prices so the
    /// selection sells for `custom_total`. Per-record updates run in order
    /// and stop at the first failure.
    pub async fn bulk_sell(
        &self,
        selected: &[InventoryItem],
        sale: &SaleDetails,
        custom_total: Option<f64>,
    ) -> RepositoryResult<()> {
        match stack::plan_bulk_sale(selected, sale, custom_total, Utc::now())? {
            BulkSalePlan::Uniform { ids, patch } => self.repo.bulk_update(&ids, &patch).await,
            BulkSalePlan::PerItem(updates) => {
                for planned in updates {
                    self.apply(planned).await?;
                }
                Ok(())
            }
        }
    }

    async fn apply(&self, planned: PlannedUpdate) -> RepositoryResult<ItemId> {
        self.repo.update(&planned.id, &planned.patch).await?;
        Ok(planned.id)
    }
}
