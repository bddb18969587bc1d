//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check
//!
//! # Products
//! GET  /                       - Featured carousel (same as /products)
//! GET  /products               - Featured carousel page (?offset=&per_page=)
//! GET  /products/{tag}         - Product detail
//! GET  /shop/{category}        - Category listing (nike, jordan, yeezy)
//! GET  /search                 - Search (?q=)
//!
//! # Cart (JSON snapshots)
//! GET  /cart                   - Cart contents and totals
//! GET  /cart/count             - Cart count badge
//! POST /cart/add               - Add one unit ({tag, size?})
//! POST /cart/increment         - Increase quantity ({tag})
//! POST /cart/decrement         - Decrease quantity, floor of one ({tag})
//! POST /cart/remove            - Remove line ({tag})
//!
//! # Checkout
//! GET  /checkout               - Subtotal, tax and total
//! POST /checkout/complete      - Simulated purchase; clears the cart
//! ```

pub mod cart;
pub mod products;
pub mod search;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{tag}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/count", get(cart::count))
        .route("/add", post(cart::add))
        .route("/increment", post(cart::increment))
        .route("/decrement", post(cart::decrement))
        .route("/remove", post(cart::remove))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::checkout))
        .route("/complete", post(cart::complete_checkout))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .nest("/products", product_routes())
        .route("/shop/{category}", get(products::category))
        .route("/search", get(search::search))
        .nest("/cart", cart_routes())
        .nest("/checkout", checkout_routes())
}
