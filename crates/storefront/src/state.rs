//! Application state shared across handlers.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::cart::{CartPersistence, CartStore};
use crate::catalog::Catalog;
use crate::config::StorefrontConfig;
use crate::error::AppError;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. It owns the one [`CartStore`];
/// handlers reach it only through [`AppState::cart`], whose lock serializes
/// mutations so each one (memory update plus persistence write) finishes
/// before the next starts.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    cart: Mutex<CartStore>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// The cart is fully restored from `persistence` before this returns, so
    /// the server never accepts a mutation ahead of the initial load.
    #[must_use]
    pub fn new(
        config: StorefrontConfig,
        catalog: Catalog,
        persistence: Arc<dyn CartPersistence>,
    ) -> Self {
        let cart = CartStore::open(persistence, config.tax_rate);
        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                cart: Mutex::new(cart),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Lock the cart store.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if a previous holder panicked.
    pub fn cart(&self) -> Result<MutexGuard<'_, CartStore>, AppError> {
        self.inner
            .cart
            .lock()
            .map_err(|_| AppError::Internal("cart lock poisoned".to_string()))
    }
}
