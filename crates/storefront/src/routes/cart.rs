//! Cart and checkout route handlers.
//!
//! Every cart mutation answers with the full cart snapshot. If the cart could
//! not be written to durable storage the mutation still stands and the
//! response carries a `warning`.
//!
//! Mutations write to the cart slot synchronously, so they run on the
//! blocking pool through [`with_cart`].

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sneakerhub_core::{Price, ProductTag, ShoeSize};
use tracing::instrument;

use crate::cart::{CartSnapshot, CartStore, CartUpdate};
use crate::error::{AppError, Result, cart_breadcrumb};
use crate::state::AppState;

/// Cart snapshot plus an optional persistence warning.
#[derive(Debug, Serialize)]
pub struct CartResponse {
    #[serde(flatten)]
    pub cart: CartSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl CartResponse {
    fn new(store: &CartStore, update: Option<CartUpdate>) -> Self {
        Self {
            cart: store.snapshot(),
            warning: update.and_then(|u| u.warning).map(|e| e.to_string()),
        }
    }
}

/// Cart count badge.
#[derive(Debug, Serialize)]
pub struct CartCount {
    pub item_count: u64,
}

/// Add to cart request.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub tag: String,
    /// Size chosen by the shopper; defaults to the catalog size.
    pub size: Option<ShoeSize>,
}

/// Request naming an existing cart line.
#[derive(Debug, Deserialize)]
pub struct LineForm {
    pub tag: String,
}

/// Completed purchase.
#[derive(Debug, Serialize)]
pub struct PurchaseResponse {
    pub item_count: u64,
    pub subtotal: Price,
    pub tax: Price,
    pub charged: Price,
    pub completed_at: DateTime<Utc>,
    /// Where the client should navigate next.
    pub redirect: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Display the cart.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Result<Json<CartResponse>> {
    let store = state.cart()?;
    Ok(Json(CartResponse::new(&store, None)))
}

/// Cart count badge.
#[instrument(skip(state))]
pub async fn count(State(state): State<AppState>) -> Result<Json<CartCount>> {
    let store = state.cart()?;
    Ok(Json(CartCount {
        item_count: store.state().item_count(),
    }))
}

/// Add one unit of a catalog product.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Json(form): Json<AddToCartForm>,
) -> Result<Json<CartResponse>> {
    let product = state
        .catalog()
        .by_tag(&form.tag)
        .ok_or_else(|| AppError::NotFound(format!("product {}", form.tag)))?;
    let size = form.size.unwrap_or(product.size);
    let product = product.clone();

    cart_breadcrumb("add", product.tag.as_str());

    with_cart(state, move |store| {
        let update = store.add(&product, size);
        CartResponse::new(store, Some(update))
    })
    .await
    .map(Json)
}

/// Increase a line's quantity.
#[instrument(skip(state))]
pub async fn increment(
    State(state): State<AppState>,
    Json(form): Json<LineForm>,
) -> Result<Json<CartResponse>> {
    mutate_line(state, form.tag, CartStore::increment).await
}

/// Decrease a line's quantity (never below one).
#[instrument(skip(state))]
pub async fn decrement(
    State(state): State<AppState>,
    Json(form): Json<LineForm>,
) -> Result<Json<CartResponse>> {
    mutate_line(state, form.tag, CartStore::decrement).await
}

/// Remove a line.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Json(form): Json<LineForm>,
) -> Result<Json<CartResponse>> {
    cart_breadcrumb("remove", &form.tag);
    mutate_line(state, form.tag, CartStore::remove).await
}

/// Checkout summary with tax and total. Read-only.
#[instrument(skip(state))]
pub async fn checkout(State(state): State<AppState>) -> Result<Json<CartSnapshot>> {
    let store = state.cart()?;
    Ok(Json(store.snapshot()))
}

/// Confirm the (simulated) purchase and clear the cart.
///
/// The cart is cleared even when it is already empty, which also purges any
/// leftover legacy slots; the receipt then charges zero.
#[instrument(skip(state))]
pub async fn complete_checkout(State(state): State<AppState>) -> Result<Json<PurchaseResponse>> {
    let (receipt, update) = with_cart(state, CartStore::complete_purchase).await?;

    Ok(Json(PurchaseResponse {
        item_count: receipt.item_count,
        subtotal: receipt.subtotal,
        tax: receipt.tax,
        charged: receipt.total,
        completed_at: receipt.completed_at,
        redirect: "/",
        warning: update.warning.map(|e| e.to_string()),
    }))
}

/// Apply a line operation. A malformed tag cannot name a cart line, so it is
/// treated like an absent one: the cart comes back unchanged.
async fn mutate_line(
    state: AppState,
    tag: String,
    op: fn(&mut CartStore, &ProductTag) -> CartUpdate,
) -> Result<Json<CartResponse>> {
    let tag = ProductTag::parse(&tag).ok();
    with_cart(state, move |store| {
        let update = tag.map(|tag| op(store, &tag));
        CartResponse::new(store, update)
    })
    .await
    .map(Json)
}

/// Run `f` against the locked cart on the blocking pool.
async fn with_cart<T, F>(state: AppState, f: F) -> Result<T>
where
    F: FnOnce(&mut CartStore) -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || -> Result<T> {
        let mut store = state.cart()?;
        Ok(f(&mut *store))
    })
    .await
    .map_err(|e| AppError::Internal(format!("cart task failed: {e}")))?
}
