//! Stack grouping: collapse interchangeable units into one display card.
//!
//! Two records belong to the same stack when they agree on brand (trimmed,
//! case-insensitive), size, condition, price, status and storage location.
//! The photo is not part of the key, so identical units photographed
//! separately still stack.
//!
//! Grouping is flat: the output is never fed back into [`group`].

use std::collections::HashMap;

use resale_core::ItemId;

use crate::item::{InventoryItem, ItemStatus};

/// Identity of a stack.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupKey {
    brand: String,
    size: String,
    condition: String,
    price_bits: u64,
    status: ItemStatus,
    storage_location: Option<String>,
}

impl GroupKey {
    pub fn of(item: &InventoryItem) -> Self {
        // `+ 0.0` folds -0.0 into 0.0 so both land in the same stack.
        let price = item.price + 0.0;
        Self {
            brand: item.brand.trim().to_lowercase(),
            size: item.size.clone(),
            condition: item.condition.clone(),
            price_bits: price.to_bits(),
            status: item.status,
            storage_location: item.storage_location.clone(),
        }
    }
}

/// A non-empty run of interchangeable units, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemGroup {
    items: Vec<InventoryItem>,
}

impl ItemGroup {
    fn start(first: InventoryItem) -> Self {
        Self { items: vec![first] }
    }

    /// The unit every stack-scoped action targets: the first one seen.
    pub fn representative(&self) -> &InventoryItem {
        &self.items[0]
    }

    pub fn items(&self) -> &[InventoryItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<InventoryItem> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// More than one unit, i.e. rendered with stack chrome.
    pub fn is_stack(&self) -> bool {
        self.items.len() > 1
    }

    /// Every id in the stack, for selection-scoped (bulk) actions.
    pub fn ids(&self) -> Vec<ItemId> {
        self.items.iter().map(|i| i.id.clone()).collect()
    }

    pub fn key(&self) -> GroupKey {
        GroupKey::of(self.representative())
    }
}

/// Cluster `items` into stacks, ordered by first occurrence.
pub fn group<I>(items: I) -> Vec<ItemGroup>
where
    I: IntoIterator<Item = InventoryItem>,
{
    let mut index: HashMap<GroupKey, usize> = HashMap::new();
    let mut groups: Vec<ItemGroup> = Vec::new();

    for item in items {
        let key = GroupKey::of(&item);
        match index.get(&key) {
            Some(&pos) => groups[pos].items.push(item),
            None => {
                index.insert(key, groups.len());
                groups.push(ItemGroup::start(item));
            }
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::NewItem;
    use chrono::Utc;

    fn unit(id: &str, price: f64, image: &str) -> InventoryItem {
        NewItem::available("SKU", "Queen", "Sealy", "Bueno", price)
            .with_location("Unit 5")
            .with_image(image)
            .into_item(ItemId::new(id), Utc::now())
    }

    fn ids(g: &ItemGroup) -> Vec<&str> {
        g.items().iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn empty_input_gives_no_groups() {
        assert!(group(Vec::new()).is_empty());
    }

    #[test]
    fn image_is_not_part_of_the_key() {
        let groups = group(vec![unit("a", 300.0, "one.jpg"), unit("b", 300.0, "two.jpg")]);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 2);
    }

    #[test]
    fn price_difference_splits_the_stack() {
        let groups = group(vec![
            unit("a", 300.0, "one.jpg"),
            unit("b", 300.0, "two.jpg"),
            unit("c", 301.0, "one.jpg"),
        ]);
        assert_eq!(groups.len(), 2);
        assert_eq!(ids(&groups[0]), ["a", "b"]);
        assert_eq!(ids(&groups[1]), ["c"]);
    }

    #[test]
    fn brand_is_compared_trimmed_and_case_insensitive() {
        let mut b = unit("b", 300.0, "x");
        b.brand = "  SEALY ".into();
        let groups = group(vec![unit("a", 300.0, "x"), b]);
        assert_eq!(groups.len(), 1);
    }

    #[test]
    fn other_key_fields_are_exact() {
        let a = unit("a", 300.0, "x");
        let mut size = unit("b", 300.0, "x");
        size.size = "queen".into();
        let mut status = unit("c", 300.0, "x");
        status.status = ItemStatus::Sold;
        let mut no_location = unit("d", 300.0, "x");
        no_location.storage_location = None;
        let mut blank_location = unit("e", 300.0, "x");
        blank_location.storage_location = Some(String::new());

        let groups = group(vec![a, size, status, no_location, blank_location]);
        assert_eq!(groups.len(), 5);
    }

    #[test]
    fn groups_keep_first_occurrence_order() {
        let groups = group(vec![
            unit("a", 1.0, "x"),
            unit("b", 2.0, "x"),
            unit("c", 1.0, "x"),
            unit("d", 3.0, "x"),
            unit("e", 2.0, "x"),
        ]);
        let reps: Vec<&str> = groups.iter().map(|g| g.representative().id.as_str()).collect();
        assert_eq!(reps, ["a", "b", "d"]);
        assert_eq!(ids(&groups[1]), ["b", "e"]);
    }

    #[test]
    fn single_unit_group_is_not_a_stack() {
        let groups = group(vec![unit("solo", 10.0, "x")]);
        assert!(!groups[0].is_stack());
        assert_eq!(groups[0].representative().id.as_str(), "solo");
        assert_eq!(groups[0].ids(), vec![ItemId::new("solo")]);
    }

    #[test]
    fn negative_zero_price_stacks_with_zero() {
        let groups = group(vec![unit("a", 0.0, "x"), unit("b", -0.0, "x")]);
        assert_eq!(groups.len(), 1);
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn arb_item() -> impl Strategy<Value = (String, String, u8, bool)> {
            (
                prop::sample::select(vec!["Sealy", "sealy ", "Casper", "IKEA"])
                    .prop_map(String::from),
                prop::sample::select(vec!["Twin", "Queen", "King"]).prop_map(String::from),
                0u8..3,
                any::<bool>(),
            )
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 500,
                ..ProptestConfig::default()
            })]

            /// Property: every input record lands in exactly one group, and
            /// each group preserves input order.
            #[test]
            fn grouping_partitions_the_input(specs in prop::collection::vec(arb_item(), 0..60)) {
                let items: Vec<InventoryItem> = specs
                    .iter()
                    .enumerate()
                    .map(|(n, (brand, size, price, sold))| {
                        let price = f64::from(*price) * 100.0;
                        let mut item =
                            NewItem::available("SKU", size.clone(), brand.clone(), "Bueno", price)
                                .into_item(ItemId::new(format!("id-{n}")), Utc::now());
                        if *sold {
                            item.status = ItemStatus::Sold;
                        }
                        item
                    })
                    .collect();

                let groups = group(items.clone());

                let total: usize = groups.iter().map(ItemGroup::len).sum();
                prop_assert_eq!(total, items.len());

                let mut positions: Vec<usize> = Vec::new();
                for g in &groups {
                    prop_assert!(!g.is_empty());
                    let key = g.key();
                    let mut last = None;
                    for member in g.items() {
                        prop_assert_eq!(GroupKey::of(member), key.clone());
                        let pos = items.iter().position(|i| i.id == member.id).unwrap();
                        if let Some(prev) = last {
                            prop_assert!(pos > prev);
                        }
                        last = Some(pos);
                    }
                    let rep = g.representative();
                    positions.push(items.iter().position(|i| i.id == rep.id).unwrap());
                }

                // Groups ordered by first occurrence.
                let mut sorted = positions.clone();
                sorted.sort_unstable();
                prop_assert_eq!(positions, sorted);

                // Keys are distinct across groups.
                for (i, a) in groups.iter().enumerate() {
                    for b in groups.iter().skip(i + 1) {
                        prop_assert_ne!(a.key(), b.key());
                    }
                }
            }
        }
    }
}
