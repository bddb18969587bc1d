//! The cart store: the single owner of cart state.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sneakerhub_core::{Price, Product, ProductTag, ShoeSize};
use tracing::instrument;

use super::persistence::CartPersistence;
use super::state::CartState;
use crate::storage::StorageError;

/// Result of a cart mutation.
///
/// The in-memory state is authoritative: if mirroring it to storage failed,
/// the mutation still stands and the failure is carried in `warning`.
#[derive(Debug)]
#[must_use]
pub struct CartUpdate {
    /// Whether the mutation changed the cart.
    pub changed: bool,
    /// Persistence failure, if the durable copy could not be updated.
    pub warning: Option<StorageError>,
}

impl CartUpdate {
    const fn unchanged() -> Self {
        Self {
            changed: false,
            warning: None,
        }
    }
}

/// One row of a [`CartSnapshot`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLine {
    pub tag: ProductTag,
    pub name: String,
    pub price: Price,
    pub size: ShoeSize,
    pub quantity: u32,
    pub line_total: Price,
}

/// Read-only view of the cart plus derived totals, recomputed on every call.
///
/// `tax` is `subtotal × rate` rounded to whole cents (midpoint away from
/// zero), and `total` is `subtotal + tax` using that rounded tax. A 175.00
/// subtotal at 6.5% gives a tax of 11.38, not 11.375.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartSnapshot {
    pub lines: Vec<CartLine>,
    pub item_count: u64,
    pub subtotal: Price,
    pub tax: Price,
    pub total: Price,
}

impl CartSnapshot {
    /// Derive a snapshot from `state` using `tax_rate` (e.g. `0.065`).
    #[must_use]
    pub fn of(state: &CartState, tax_rate: Decimal) -> Self {
        let lines = state
            .iter()
            .map(|(tag, item)| CartLine {
                tag: tag.clone(),
                name: item.name.clone(),
                price: item.price,
                size: item.size,
                quantity: item.quantity.get(),
                line_total: item.line_total(),
            })
            .collect();
        let subtotal = state.subtotal();
        let tax = subtotal.scaled(tax_rate);

        Self {
            lines,
            item_count: state.item_count(),
            subtotal,
            tax,
            total: subtotal + tax,
        }
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Summary of a completed (simulated) purchase.
#[derive(Debug, Clone, Serialize)]
pub struct Receipt {
    pub item_count: u64,
    pub subtotal: Price,
    pub tax: Price,
    pub total: Price,
    pub completed_at: DateTime<Utc>,
}

/// Owner of the cart.
///
/// All mutations go through here; after each one that changes the cart the
/// full state is written through [`CartPersistence`].
pub struct CartStore {
    state: CartState,
    persistence: Arc<dyn CartPersistence>,
    tax_rate: Decimal,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("state", &self.state)
            .field("tax_rate", &self.tax_rate)
            .finish_non_exhaustive()
    }
}

impl CartStore {
    /// Restore the cart from `persistence`.
    ///
    /// The store is fully loaded before it is returned, so no mutation can
    /// race the initial load.
    #[must_use]
    #[instrument(skip_all)]
    pub fn open(persistence: Arc<dyn CartPersistence>, tax_rate: Decimal) -> Self {
        let state = persistence.load();
        tracing::info!(
            lines = state.len(),
            items = state.item_count(),
            "cart restored"
        );
        Self {
            state,
            persistence,
            tax_rate,
        }
    }

    /// The current line items.
    #[must_use]
    pub const fn state(&self) -> &CartState {
        &self.state
    }

    /// Derived view for rendering.
    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot::of(&self.state, self.tax_rate)
    }

    /// Add one unit of `product` in `size` (the size of an existing line wins).
    #[instrument(skip(self, product), fields(tag = %product.tag))]
    pub fn add(&mut self, product: &Product, size: ShoeSize) -> CartUpdate {
        let changed = self.state.add(product, size);
        self.commit(changed)
    }

    /// Bump the quantity of `tag`; no-op if absent.
    #[instrument(skip(self))]
    pub fn increment(&mut self, tag: &ProductTag) -> CartUpdate {
        let changed = self.state.increment(tag);
        self.commit(changed)
    }

    /// Lower the quantity of `tag`; no-op at quantity one or if absent.
    #[instrument(skip(self))]
    pub fn decrement(&mut self, tag: &ProductTag) -> CartUpdate {
        let changed = self.state.decrement(tag);
        self.commit(changed)
    }

    /// Drop the line for `tag`; no-op if absent.
    #[instrument(skip(self))]
    pub fn remove(&mut self, tag: &ProductTag) -> CartUpdate {
        let changed = self.state.remove(tag);
        self.commit(changed)
    }

    /// Empty the cart and delete its durable copy (legacy slots included).
    #[instrument(skip(self))]
    pub fn clear(&mut self) -> CartUpdate {
        let changed = self.state.clear();
        let warning = self.persistence.clear().err();
        if let Some(e) = &warning {
            tracing::warn!(error = %e, "failed to clear persisted cart");
        }
        CartUpdate { changed, warning }
    }

    /// Confirm the purchase: produce a receipt and clear the cart.
    ///
    /// The cart and its durable copy (legacy slots included) are always
    /// cleared. An empty cart yields a zero receipt.
    #[instrument(skip(self))]
    pub fn complete_purchase(&mut self) -> (Receipt, CartUpdate) {
        let snapshot = self.snapshot();
        let receipt = Receipt {
            item_count: snapshot.item_count,
            subtotal: snapshot.subtotal,
            tax: snapshot.tax,
            total: snapshot.total,
            completed_at: Utc::now(),
        };
        tracing::info!(items = receipt.item_count, total = %receipt.total, "purchase completed");

        let update = self.clear();
        (receipt, update)
    }

    fn commit(&self, changed: bool) -> CartUpdate {
        if !changed {
            return CartUpdate::unchanged();
        }

        let warning = self.persistence.save(&self.state).err();
        if let Some(e) = &warning {
            tracing::warn!(error = %e, "failed to persist cart; keeping in-memory state");
        }
        CartUpdate {
            changed: true,
            warning,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cart::SlotPersistence;
    use crate::storage::{KeyValueStore, MemoryStore};
    use sneakerhub_core::Category;

    const TAX_RATE: Decimal = Decimal::from_parts(65, 0, 0, false, 3);

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

    fn memory_store() -> (Arc<MemoryStore>, CartStore) {
        let kv = Arc::new(MemoryStore::new());
        let store = CartStore::open(Arc::new(SlotPersistence::new(kv.clone())), TAX_RATE);
        (kv, store)
    }

    #[test]
    fn test_panda_scenario() {
        let (_, mut store) = memory_store();
        let panda = product("panda", 150);

        let _ = store.add(&panda, size(11.0));
        let _ = store.add(&panda, size(9.0));
        let _ = store.increment(&panda.tag);

        let item = store.state().get(&panda.tag).unwrap();
        assert_eq!(item.quantity.get(), 3);
        assert_eq!(item.size, size(11.0));
        assert_eq!(item.price, Price::from_dollars(150));

        let snapshot = store.snapshot();
        assert_eq!(snapshot.item_count, 3);
        assert_eq!(snapshot.subtotal, Price::from_dollars(450));
        assert_eq!(snapshot.tax, Price::from_cents(2925));
        assert_eq!(snapshot.total, Price::from_cents(47925));
        assert_eq!(snapshot.lines[0].line_total, Price::from_dollars(450));

        let update = store.remove(&panda.tag);
        assert!(update.changed);
        let snapshot = store.snapshot();
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.item_count, 0);
        assert_eq!(snapshot.subtotal, Price::ZERO);
    }

    #[test]
    fn test_mutations_are_persisted() {
        let (kv, mut store) = memory_store();
        let _ = store.add(&product("onyx", 275), size(10.0));

        let reopened = CartStore::open(Arc::new(SlotPersistence::new(kv)), TAX_RATE);
        assert_eq!(reopened.state(), store.state());
    }

    #[test]
    fn test_noop_reports_unchanged() {
        let (_, mut store) = memory_store();
        let update = store.decrement(&ProductTag::parse("ghost").unwrap());
        assert!(!update.changed);
        assert!(update.warning.is_none());
    }

    #[test]
    fn test_write_failure_keeps_memory_state() {
        let kv = Arc::new(MemoryStore::with_quota(4));
        let mut store = CartStore::open(Arc::new(SlotPersistence::new(kv.clone())), TAX_RATE);

        let update = store.add(&product("canvas", 375), size(12.0));
        assert!(update.changed);
        assert!(matches!(
            update.warning,
            Some(StorageError::QuotaExceeded { .. })
        ));
        assert_eq!(store.snapshot().item_count, 1);
        assert!(kv.get("cart_state").unwrap().is_none());
    }

    #[test]
    fn test_complete_purchase_clears() {
        let (kv, mut store) = memory_store();
        let _ = store.add(&product("pirate", 300), size(10.0));
        kv.set("totalCost", "300.00").unwrap();

        let (receipt, update) = store.complete_purchase();
        assert_eq!(receipt.subtotal, Price::from_dollars(300));
        assert_eq!(receipt.tax, Price::from_cents(1950));
        assert_eq!(receipt.total, Price::from_cents(31950));
        assert!(update.changed);
        assert!(store.state().is_empty());
        assert!(kv.is_empty());
    }

    #[test]
    fn test_complete_purchase_on_empty_cart_purges_legacy_counters() {
        let (kv, mut store) = memory_store();
        kv.set("cartNumbers", "2").unwrap();
        kv.set("totalCost", "300.00").unwrap();

        let (receipt, update) = store.complete_purchase();
        assert_eq!(receipt.item_count, 0);
        assert_eq!(receipt.total, Price::ZERO);
        assert!(!update.changed);
        assert!(update.warning.is_none());
        assert!(kv.is_empty());
    }

    #[test]
    fn test_legacy_cart_written_back_on_next_mutation() {
        let kv = Arc::new(MemoryStore::new());
        kv.set(
            "productsInCart",
            r#"{"panda":{"name":"Nike Dunk Low Panda","price":150,"size":11,"inCart":2}}"#,
        )
        .unwrap();

        let mut store = CartStore::open(Arc::new(SlotPersistence::new(kv.clone())), TAX_RATE);
        assert_eq!(store.snapshot().item_count, 2);
        assert!(kv.get("cart_state").unwrap().is_none());

        let update = store.increment(&ProductTag::parse("panda").unwrap());
        assert!(update.changed);
        assert!(update.warning.is_none());

        let raw = kv.get("cart_state").unwrap().unwrap();
        let persisted: CartState = serde_json::from_str(&raw).unwrap();
        assert_eq!(&persisted, store.state());
        assert_eq!(persisted.item_count(), 3);

        let reopened = CartStore::open(Arc::new(SlotPersistence::new(kv)), TAX_RATE);
        assert_eq!(reopened.state(), store.state());
        assert_eq!(reopened.snapshot().subtotal, Price::from_dollars(450));
    }
}
