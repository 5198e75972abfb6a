//! The fixed demo dataset written into an empty local slot.

use chrono::{DateTime, Duration, Utc};

use resale_core::ItemId;
use resale_inventory::{DeliveryMethod, InventoryItem, ItemStatus, NewItem};

const PHOTO_QUEEN: &str =
    "https://images.unsplash.com/photo-1505693416388-b0346ef3f495?auto=format&fit=crop&q=80&w=800";
const PHOTO_KING: &str =
    "https://images.unsplash.com/photo-1631049307264-da0ec9d70304?auto=format&fit=crop&q=80&w=800";
const PHOTO_FULL: &str =
    "https://images.unsplash.com/photo-1629949009765-413d74917a11?auto=format&fit=crop&q=80&w=800";
const PHOTO_TWIN: &str =
    "https://images.unsplash.com/photo-1584132967334-10e028bd69f7?auto=format&fit=crop&q=80&w=800";

/// Demo records without identity, in display order.
pub fn demo_drafts() -> Vec<NewItem> {
    let mut sold = NewItem::available("SKU-1293", "King", "Tempur-Pedic Adapt", "Bueno", 899.0)
        .with_location("Unit 8")
        .with_image(PHOTO_KING);
    sold.status = ItemStatus::Sold;
    sold.customer_name = Some("Tony Stark".to_string());
    sold.customer_phone = Some("555-0199".to_string());
    sold.delivery_method = Some(DeliveryMethod::Delivery);
    sold.delivery_address = Some("10880 Malibu Point, CA".to_string());

    vec![
        NewItem::available("SKU-8821", "Queen", "DreamCloud Luxury", "Como Nuevo", 450.0)
            .with_location("Unit 4")
            .with_image(PHOTO_QUEEN),
        sold,
        NewItem::available("SKU-4421", "Full", "Casper Original", "Nuevo", 600.0)
            .with_location("Unit 1")
            .with_image(PHOTO_FULL),
        NewItem::available("SKU-9900", "Twin", "IKEA Morgedal", "Con Detalles", 150.0)
            .with_location("Pasillo B")
            .with_image(PHOTO_TWIN),
    ]
}

/// Demo records `demo-1` .. `demo-4`. The sold King was taken in a day
/// before `now`.
pub fn demo_items(now: DateTime<Utc>) -> Vec<InventoryItem> {
    demo_drafts()
        .into_iter()
        .enumerate()
        .map(|(idx, draft)| {
            let created_at = if idx == 1 {
                now - Duration::days(1)
            } else {
                now
            };
            draft.into_item(ItemId::new(format!("demo-{}", idx + 1)), created_at)
        })
        .collect()
}
