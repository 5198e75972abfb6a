use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use resale_core::{DomainError, DomainResult, ItemId};

/// Sale state of a unit.
///
/// The normal flow is `Available → Sold → Delivered`, but the data layer
/// accepts any value; keeping the flow forward-only is up to the caller.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemStatus {
    Available,
    Sold,
    Delivered,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Available => "Available",
            ItemStatus::Sold => "Sold",
            ItemStatus::Delivered => "Delivered",
        }
    }

    /// Sold or delivered.
    pub fn is_sale(&self) -> bool {
        matches!(self, ItemStatus::Sold | ItemStatus::Delivered)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeliveryMethod {
    Pickup,
    Delivery,
}

/// One physical unit in stock (or already sold).
///
/// Field names on the wire follow the hosted table's columns, which mix
/// camelCase with the two snake_case timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: ItemId,
    pub sku: String,
    pub size: String,
    pub brand: String,
    pub condition: String,
    pub price: f64,
    pub status: ItemStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(rename = "created_at")]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_method: Option<DeliveryMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_address: Option<String>,
    #[serde(
        rename = "sold_at",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub sold_at: Option<DateTime<Utc>>,
}

impl InventoryItem {
    /// Date used to order sales history: `sold_at`, or `created_at` for
    /// records sold before `sold_at` was tracked.
    pub fn sale_date(&self) -> DateTime<Utc> {
        self.sold_at.unwrap_or(self.created_at)
    }

    /// Merge a partial update into this record. `id` and `created_at` are
    /// never touched.
    pub fn apply_patch(&mut self, patch: &ItemPatch) {
        if let Some(v) = &patch.sku {
            self.sku = v.clone();
        }
        if let Some(v) = &patch.size {
            self.size = v.clone();
        }
        if let Some(v) = &patch.brand {
            self.brand = v.clone();
        }
        if let Some(v) = &patch.condition {
            self.condition = v.clone();
        }
        if let Some(v) = patch.price {
            self.price = v;
        }
        if let Some(v) = patch.status {
            self.status = v;
        }
        if let Some(v) = &patch.image {
            self.image = Some(v.clone());
        }
        if let Some(v) = &patch.storage_location {
            self.storage_location = Some(v.clone());
        }
        if let Some(v) = &patch.customer_name {
            self.customer_name = Some(v.clone());
        }
        if let Some(v) = &patch.customer_phone {
            self.customer_phone = Some(v.clone());
        }
        if let Some(v) = patch.delivery_method {
            self.delivery_method = Some(v);
        }
        if let Some(v) = &patch.delivery_address {
            self.delivery_address = Some(v.clone());
        }
        if let Some(v) = patch.sold_at {
            self.sold_at = Some(v);
        }
    }
}

/// A record as submitted by the operator, before storage assigns `id` and
/// `created_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewItem {
    pub sku: String,
    pub size: String,
    pub brand: String,
    pub condition: String,
    pub price: f64,
    pub status: ItemStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_method: Option<DeliveryMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_address: Option<String>,
    #[serde(
        rename = "sold_at",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub sold_at: Option<DateTime<Utc>>,
}

impl NewItem {
    /// An available unit with the given descriptive attributes.
    pub fn available(
        sku: impl Into<String>,
        size: impl Into<String>,
        brand: impl Into<String>,
        condition: impl Into<String>,
        price: f64,
    ) -> Self {
        Self {
            sku: sku.into(),
            size: size.into(),
            brand: brand.into(),
            condition: condition.into(),
            price,
            status: ItemStatus::Available,
            image: None,
            storage_location: None,
            customer_name: None,
            customer_phone: None,
            delivery_method: None,
            delivery_address: None,
            sold_at: None,
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.storage_location = Some(location.into());
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn validate(&self) -> DomainResult<()> {
        validate_price(self.price)
    }

    /// Materialise the record once storage has assigned identity.
    pub fn into_item(self, id: ItemId, created_at: DateTime<Utc>) -> InventoryItem {
        InventoryItem {
            id,
            sku: self.sku,
            size: self.size,
            brand: self.brand,
            condition: self.condition,
            price: self.price,
            status: self.status,
            image: self.image,
            created_at,
            storage_location: self.storage_location,
            customer_name: self.customer_name,
            customer_phone: self.customer_phone,
            delivery_method: self.delivery_method,
            delivery_address: self.delivery_address,
            sold_at: self.sold_at,
        }
    }
}

impl From<InventoryItem> for NewItem {
    fn from(item: InventoryItem) -> Self {
        Self {
            sku: item.sku,
            size: item.size,
            brand: item.brand,
            condition: item.condition,
            price: item.price,
            status: item.status,
            image: item.image,
            storage_location: item.storage_location,
            customer_name: item.customer_name,
            customer_phone: item.customer_phone,
            delivery_method: item.delivery_method,
            delivery_address: item.delivery_address,
            sold_at: item.sold_at,
        }
    }
}

/// Field-level partial update. `None` leaves the field untouched.
///
/// Optional fields cannot be cleared: customer and delivery details stay on
/// the record even if its status goes back to `Available`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ItemStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_method: Option<DeliveryMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_address: Option<String>,
    #[serde(
        rename = "sold_at",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub sold_at: Option<DateTime<Utc>>,
}

impl ItemPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn status(mut self, status: ItemStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn storage_location(mut self, location: impl Into<String>) -> Self {
        self.storage_location = Some(location.into());
        self
    }

    pub fn image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn sold_at(mut self, at: DateTime<Utc>) -> Self {
        self.sold_at = Some(at);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn validate(&self) -> DomainResult<()> {
        match self.price {
            Some(price) => validate_price(price),
            None => Ok(()),
        }
    }
}

fn validate_price(price: f64) -> DomainResult<()> {
    if !price.is_finite() {
        return Err(DomainError::validation("price must be a finite number"));
    }
    if price < 0.0 {
        return Err(DomainError::validation("price cannot be negative"));
    }
    Ok(())
}
