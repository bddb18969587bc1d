//! The cart's line-item map and its transition rules.

use std::fmt;
use std::marker::PhantomData;
use std::num::NonZeroU32;

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use sneakerhub_core::{Price, Product, ProductTag, ShoeSize};

/// One entry in the cart.
///
/// `name` and `price` are copied from the product when the entry is created
/// and are never re-synced with the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub name: String,
    pub price: Price,
    pub size: ShoeSize,
    pub quantity: NonZeroU32,
}

impl CartLineItem {
    /// A fresh line with quantity 1.
    #[must_use]
    pub fn new(product: &Product, size: ShoeSize) -> Self {
        Self {
            name: product.name.clone(),
            price: product.price,
            size,
            quantity: NonZeroU32::MIN,
        }
    }

    /// `price × quantity`.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity.get())
    }
}

/// Mapping from product tag to exactly one [`CartLineItem`].
///
/// Entries keep the order in which their tags were first added. The transition
/// methods return whether the state changed; operations on absent tags and
/// decrements below one are no-ops rather than errors.
///
/// Serialized as a JSON object keyed by tag:
///
/// ```json
/// {"panda": {"name": "Nike Dunk Low Panda", "price": 150.0, "size": 11.0, "quantity": 3}}
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartState {
    entries: Vec<(ProductTag, CartLineItem)>,
}

impl CartState {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Whether the cart holds no line items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct line items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Look up the line item for `tag`.
    #[must_use]
    pub fn get(&self, tag: &ProductTag) -> Option<&CartLineItem> {
        self.entries.iter().find(|(t, _)| t == tag).map(|(_, item)| item)
    }

    /// Iterate line items in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&ProductTag, &CartLineItem)> {
        self.entries.iter().map(|(tag, item)| (tag, item))
    }

    fn get_mut(&mut self, tag: &ProductTag) -> Option<&mut CartLineItem> {
        self.entries
            .iter_mut()
            .find(|(t, _)| t == tag)
            .map(|(_, item)| item)
    }

    /// Add one unit of `product`.
    ///
    /// An existing entry has its quantity bumped and keeps the size it was
    /// first added with; otherwise a new entry is created with `size`.
    pub fn add(&mut self, product: &Product, size: ShoeSize) -> bool {
        if let Some(item) = self.get_mut(&product.tag) {
            item.quantity = item.quantity.saturating_add(1);
        } else {
            self.entries
                .push((product.tag.clone(), CartLineItem::new(product, size)));
        }
        true
    }

    /// Bump the quantity of `tag` by one.
    pub fn increment(&mut self, tag: &ProductTag) -> bool {
        let Some(item) = self.get_mut(tag) else {
            return false;
        };
        let before = item.quantity;
        item.quantity = before.saturating_add(1);
        item.quantity != before
    }

    /// Lower the quantity of `tag` by one, never below one.
    ///
    /// A quantity-1 entry stays in the cart; use [`Self::remove`] to drop it.
    pub fn decrement(&mut self, tag: &ProductTag) -> bool {
        let Some(item) = self.get_mut(tag) else {
            return false;
        };
        match NonZeroU32::new(item.quantity.get() - 1) {
            Some(lower) => {
                item.quantity = lower;
                true
            }
            None => false,
        }
    }

    /// Drop the entry for `tag`.
    pub fn remove(&mut self, tag: &ProductTag) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(t, _)| t != tag);
        self.entries.len() != before
    }

    /// Drop every entry.
    pub fn clear(&mut self) -> bool {
        let changed = !self.entries.is_empty();
        self.entries.clear();
        changed
    }

    /// Total units across all line items.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.entries
            .iter()
            .map(|(_, item)| u64::from(item.quantity.get()))
            .sum()
    }

    /// Sum of `price × quantity` across all line items.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.entries.iter().map(|(_, item)| item.line_total()).sum()
    }

    /// Build a state from already-ordered entries, rejecting duplicate tags.
    pub(crate) fn from_entries(
        entries: Vec<(ProductTag, CartLineItem)>,
    ) -> Result<Self, ProductTag> {
        let mut state = Self::new();
        for (tag, item) in entries {
            if state.get(&tag).is_some() {
                return Err(tag);
            }
            state.entries.push((tag, item));
        }
        Ok(state)
    }
}

impl Serialize for CartState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (tag, item) in &self.entries {
            map.serialize_entry(tag, item)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CartState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let OrderedEntries(entries) = OrderedEntries::<CartLineItem>::deserialize(deserializer)?;
        Self::from_entries(entries)
            .map_err(|tag| de::Error::custom(format!("duplicate tag {tag}")))
    }
}

/// A JSON object read as `(tag, value)` pairs in document order.
pub(crate) struct OrderedEntries<V>(pub Vec<(ProductTag, V)>);

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedEntries<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for EntriesVisitor<V> {
            type Value = OrderedEntries<V>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object keyed by product tag")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((tag, value)) = access.next_entry::<ProductTag, V>()? {
                    entries.push((tag, value));
                }
                Ok(OrderedEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor(PhantomData))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sneakerhub_core::Category;

    fn product(tag: &str, dollars: u32) -> Product {
        Product {
            name: format!("Sneaker {tag}"),
            tag: ProductTag::parse(tag).unwrap(),
            price: Price::from_dollars(dollars),
            size: ShoeSize::from_f64(10.0).unwrap(),
            image: format!("/img/{tag}.png"),
            category: Category::Nike,
        }
    }

    fn size(value: f64) -> ShoeSize {
        ShoeSize::from_f64(value).unwrap()
    }

    fn tag(s: &str) -> ProductTag {
        ProductTag::parse(s).unwrap()
    }

    #[test]
    fn test_add_new_and_existing() {
        let mut state = CartState::new();
        assert!(state.add(&product("panda", 150), size(11.0)));
        assert!(state.add(&product("panda", 150), size(9.0)));

        let item = state.get(&tag("panda")).unwrap();
        assert_eq!(item.quantity.get(), 2);
        assert_eq!(item.size, size(11.0));
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn test_add_keeps_price_from_first_add() {
        let mut state = CartState::new();
        state.add(&product("panda", 150), size(11.0));
        state.add(&product("panda", 999), size(11.0));
        assert_eq!(state.get(&tag("panda")).unwrap().price, Price::from_dollars(150));
    }

    #[test]
    fn test_decrement_floor() {
        let mut state = CartState::new();
        state.add(&product("kd", 290), size(11.0));
        assert!(!state.decrement(&tag("kd")));
        assert_eq!(state.get(&tag("kd")).unwrap().quantity.get(), 1);

        state.increment(&tag("kd"));
        assert!(state.decrement(&tag("kd")));
        assert_eq!(state.get(&tag("kd")).unwrap().quantity.get(), 1);
    }

    #[test]
    fn test_absent_tag_is_noop() {
        let mut state = CartState::new();
        assert!(!state.increment(&tag("ghost")));
        assert!(!state.decrement(&tag("ghost")));
        assert!(!state.remove(&tag("ghost")));
        assert!(!state.clear());
        assert!(state.is_empty());
    }

    #[test]
    fn test_remove_and_clear() {
        let mut state = CartState::new();
        state.add(&product("panda", 150), size(11.0));
        state.add(&product("onyx", 275), size(10.0));

        assert!(state.remove(&tag("panda")));
        assert_eq!(state.len(), 1);
        assert!(state.clear());
        assert!(state.is_empty());
    }

    #[test]
    fn test_derived_values() {
        let mut state = CartState::new();
        state.add(&product("panda", 150), size(11.0));
        state.add(&product("panda", 150), size(11.0));
        state.add(&product("onyx", 275), size(10.0));

        assert_eq!(state.item_count(), 3);
        assert_eq!(state.subtotal(), Price::from_dollars(575));
    }

    #[test]
    fn test_serde_preserves_order() {
        let mut state = CartState::new();
        state.add(&product("slag", 200), size(9.0));
        state.add(&product("cinder", 150), size(10.0));
        state.add(&product("ebay", 150), size(8.5));

        let json = serde_json::to_string(&state).unwrap();
        let slag = json.find("slag").unwrap();
        let cinder = json.find("cinder").unwrap();
        let ebay = json.find("ebay").unwrap();
        assert!(slag < cinder && cinder < ebay);

        let parsed: CartState = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, state);
    }

    #[test]
    fn test_persisted_layout() {
        let mut state = CartState::new();
        state.add(&product("panda", 150), size(11.0));

        let value = serde_json::to_value(&state).unwrap();
        let item = &value["panda"];
        assert_eq!(item["name"], "Sneaker panda");
        assert_eq!(item["price"].as_f64(), Some(150.0));
        assert_eq!(item["size"].as_f64(), Some(11.0));
        assert_eq!(item["quantity"].as_u64(), Some(1));
    }

    #[test]
    fn test_deserialize_rejects_bad_shapes() {
        // zero quantity
        assert!(
            serde_json::from_str::<CartState>(
                r#"{"panda":{"name":"P","price":150,"size":11,"quantity":0}}"#
            )
            .is_err()
        );
        // duplicate tag after case folding
        assert!(
            serde_json::from_str::<CartState>(
                r#"{"panda":{"name":"P","price":150,"size":11,"quantity":1},
                    "PANDA":{"name":"P","price":150,"size":11,"quantity":1}}"#
            )
            .is_err()
        );
        // not an object
        assert!(serde_json::from_str::<CartState>("[1,2,3]").is_err());
    }
}
