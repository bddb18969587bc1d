//! Product and category route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use sneakerhub_core::{Category, Price, Product, ProductTag, ShoeSize};
use tracing::instrument;

use crate::catalog::DEFAULT_PAGE_SIZE;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Largest page the featured carousel will serve.
const MAX_PER_PAGE: usize = 24;

/// Product display data.
#[derive(Debug, Clone, Serialize)]
pub struct ProductView {
    pub tag: ProductTag,
    pub name: String,
    pub price: Price,
    pub price_display: String,
    pub size: ShoeSize,
    pub image: String,
    pub category: Category,
    pub url: String,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            tag: product.tag.clone(),
            name: product.name.clone(),
            price: product.price,
            price_display: product.price.to_string(),
            size: product.size,
            image: product.image.clone(),
            category: product.category,
            url: format!("/products/{}", product.tag),
        }
    }
}

/// Featured carousel query parameters.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub offset: Option<usize>,
    pub per_page: Option<usize>,
}

/// One carousel page.
#[derive(Debug, Serialize)]
pub struct FeaturedPage {
    pub products: Vec<ProductView>,
    pub offset: usize,
    pub next_offset: usize,
    pub previous_offset: usize,
    pub total: usize,
}

/// Category listing.
#[derive(Debug, Serialize)]
pub struct CategoryView {
    pub category: Category,
    pub products: Vec<ProductView>,
}

/// Featured products carousel.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>, Query(query): Query<PageQuery>) -> Json<FeaturedPage> {
    let per_page = query
        .per_page
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .min(MAX_PER_PAGE);
    let page = state.catalog().page(query.offset.unwrap_or(0), per_page);

    Json(FeaturedPage {
        products: page.products.into_iter().map(ProductView::from).collect(),
        offset: page.offset,
        next_offset: page.next_offset,
        previous_offset: page.previous_offset,
        total: page.total,
    })
}

/// Product detail.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(tag): Path<String>) -> Result<Json<ProductView>> {
    state
        .catalog()
        .by_tag(&tag)
        .map(|product| Json(ProductView::from(product)))
        .ok_or_else(|| AppError::NotFound(format!("product {tag}")))
}

/// Category listing (`/shop/nike`, `/shop/jordan`, `/shop/yeezy`).
#[instrument(skip(state))]
pub async fn category(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<CategoryView>> {
    let category = Category::parse(&slug)?;

    Ok(Json(CategoryView {
        category,
        products: state
            .catalog()
            .by_category(category)
            .into_iter()
            .map(ProductView::from)
            .collect(),
    }))
}
