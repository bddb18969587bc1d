//! Mirrors the cart into a durable key-value slot.
//!
//! The cart lives in a single slot, [`CART_STATE_KEY`]. Older storefront
//! builds kept a line-item map under [`LEGACY_ITEMS_KEY`] next to two
//! independently maintained counters ([`LEGACY_COUNT_KEY`],
//! [`LEGACY_TOTAL_KEY`]). Those counters are never read or written; clearing
//! the cart deletes them so a stale total cannot resurface. The legacy
//! line-item map is imported once when no current slot exists.

use std::num::NonZeroU32;
use std::sync::Arc;

use serde::Deserialize;
use sneakerhub_core::{Price, ShoeSize};

use super::state::{CartLineItem, CartState, OrderedEntries};
use crate::storage::{KeyValueStore, StorageError};

/// Slot holding the serialized [`CartState`].
pub const CART_STATE_KEY: &str = "cart_state";
/// Slot used by older builds for the line-item map.
pub const LEGACY_ITEMS_KEY: &str = "productsInCart";
/// Slot used by older builds for a running item count.
pub const LEGACY_COUNT_KEY: &str = "cartNumbers";
/// Slot used by older builds for a running price total.
pub const LEGACY_TOTAL_KEY: &str = "totalCost";

/// Load/save/clear contract between the cart store and durable storage.
pub trait CartPersistence: Send + Sync {
    /// Restore the cart. Absent or unreadable data yields an empty cart.
    fn load(&self) -> CartState;

    /// Overwrite the durable copy with `state`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the slot cannot be written.
    fn save(&self, state: &CartState) -> Result<(), StorageError>;

    /// Remove the durable copy together with every legacy slot.
    ///
    /// # Errors
    ///
    /// Returns the first [`StorageError`] hit; the remaining slots are still
    /// attempted.
    fn clear(&self) -> Result<(), StorageError>;
}

/// [`CartPersistence`] over any [`KeyValueStore`].
#[derive(Clone)]
pub struct SlotPersistence {
    store: Arc<dyn KeyValueStore>,
}

impl SlotPersistence {
    /// Wrap a key-value store.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn load_legacy(&self) -> Option<CartState> {
        let raw = match self.store.get(LEGACY_ITEMS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read legacy cart slot");
                return None;
            }
        };

        let OrderedEntries(entries) =
            match serde_json::from_str::<OrderedEntries<LegacyLineItem>>(&raw) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!(error = %e, "ignoring unparseable legacy cart");
                    return None;
                }
            };

        let items = entries
            .into_iter()
            .filter_map(|(tag, legacy)| {
                NonZeroU32::new(legacy.quantity).map(|quantity| {
                    let item = CartLineItem {
                        name: legacy.name,
                        price: legacy.price,
                        size: legacy.size,
                        quantity,
                    };
                    (tag, item)
                })
            })
            .collect();

        match CartState::from_entries(items) {
            Ok(state) => {
                tracing::info!(lines = state.len(), "imported legacy cart");
                Some(state)
            }
            Err(tag) => {
                tracing::warn!(%tag, "ignoring legacy cart with duplicate tag");
                None
            }
        }
    }
}

impl CartPersistence for SlotPersistence {
    fn load(&self) -> CartState {
        match self.store.get(CART_STATE_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "discarding unparseable cart slot");
                CartState::new()
            }),
            Ok(None) => self.load_legacy().unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read cart slot");
                CartState::new()
            }
        }
    }

    fn save(&self, state: &CartState) -> Result<(), StorageError> {
        let json = serde_json::to_string(state).map_err(|source| StorageError::Encode {
            key: CART_STATE_KEY.to_string(),
            source,
        })?;
        self.store.set(CART_STATE_KEY, &json)
    }

    fn clear(&self) -> Result<(), StorageError> {
        let mut first_err = None;
        for key in [
            CART_STATE_KEY,
            LEGACY_ITEMS_KEY,
            LEGACY_COUNT_KEY,
            LEGACY_TOTAL_KEY,
        ] {
            if let Err(e) = self.store.remove(key) {
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }
}

/// Line item as written by older builds, which counted units in `inCart`.
#[derive(Deserialize)]
struct LegacyLineItem {
    name: String,
    price: Price,
    size: ShoeSize,
    #[serde(alias = "inCart")]
    quantity: u32,
}
