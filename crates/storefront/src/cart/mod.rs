//! Shopping cart: line-item state, its owner, and its durable mirror.
//!
//! # Architecture
//!
//! - [`CartState`] - tag → line-item map with the add/increment/decrement/
//!   remove/clear rules; pure, no I/O
//! - [`CartStore`] - the single owner of a `CartState`; writes every change
//!   through a [`CartPersistence`] and derives totals on read
//! - [`SlotPersistence`] - `CartPersistence` over a
//!   [`KeyValueStore`](crate::storage::KeyValueStore) slot
//!
//! Item count, subtotal, tax and total are always recomputed from the line
//! items. No counter is stored alongside them.

mod persistence;
mod state;
mod store;

pub use persistence::{
    CART_STATE_KEY, CartPersistence, LEGACY_COUNT_KEY, LEGACY_ITEMS_KEY, LEGACY_TOTAL_KEY,
    SlotPersistence,
};
pub use state::{CartLineItem, CartState};
pub use store::{CartLine, CartSnapshot, CartStore, CartUpdate, Receipt};
