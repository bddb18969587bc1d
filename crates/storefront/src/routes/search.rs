//! Search route handler.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::products::ProductView;
use crate::state::AppState;

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Search results.
#[derive(Debug, Serialize)]
pub struct SearchResults {
    pub query: String,
    pub results: Vec<ProductView>,
}

/// Search products by name, tag or category.
///
/// A blank query returns no results.
#[instrument(skip(state))]
pub async fn search(State(state): State<AppState>, Query(query): Query<SearchQuery>) -> Json<SearchResults> {
    let results = state
        .catalog()
        .search(&query.q)
        .into_iter()
        .map(ProductView::from)
        .collect();

    Json(SearchResults {
        query: query.q.trim().to_string(),
        results,
    })
}
