//! Static, read-only product catalog.
//!
//! The catalog ships with the binary (`products.json`) and can be replaced at
//! startup with a file of the same shape (see `STOREFRONT_CATALOG_PATH`). It is
//! validated once on load and never mutated afterwards.

use std::collections::HashSet;
use std::path::Path;

use serde::Serialize;
use sneakerhub_core::{Category, Product, ProductTag};
use thiserror::Error;
use tracing::instrument;

const BUILTIN_CATALOG: &str = include_str!("products.json");

/// Products per page in the featured carousel.
pub const DEFAULT_PAGE_SIZE: usize = 4;

/// Errors raised while loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid catalog data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate product tag: {0}")]
    DuplicateTag(ProductTag),

    #[error("product {0} must have a price above zero")]
    FreeProduct(ProductTag),
}

/// One page of the featured carousel.
///
/// Paging wraps: past the last page `next_offset` returns to 0, and before the
/// first page `previous_offset` jumps to the last full page.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogPage<'a> {
    pub products: Vec<&'a Product>,
    pub offset: usize,
    pub next_offset: usize,
    pub previous_offset: usize,
    pub total: usize,
}

/// The product list with lookup, filter and search.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate tags and zero prices.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateTag`] or [`CatalogError::FreeProduct`].
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(products.len());
        for product in &products {
            if !seen.insert(&product.tag) {
                return Err(CatalogError::DuplicateTag(product.tag.clone()));
            }
            if product.price.is_zero() {
                return Err(CatalogError::FreeProduct(product.tag.clone()));
            }
        }
        Ok(Self { products })
    }

    /// The catalog compiled into the binary.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if the embedded data is invalid.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    /// Parse a catalog from a JSON array of products.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if the JSON is malformed or fails validation.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let products: Vec<Product> = serde_json::from_str(json)?;
        Self::new(products)
    }

    /// Load a catalog from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if the file cannot be read or is invalid.
    #[instrument]
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Case-insensitive exact lookup. Malformed tags simply find nothing.
    ///
    /// The tag goes through [`ProductTag::parse`], so surrounding whitespace
    /// is ignored (`" panda "` finds `panda`).
    #[must_use]
    pub fn by_tag(&self, tag: &str) -> Option<&Product> {
        let tag = ProductTag::parse(tag).ok()?;
        self.products.iter().find(|p| p.tag == tag)
    }

    /// Every product in `category`, in catalog order.
    #[must_use]
    pub fn by_category(&self, category: Category) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.category == category)
            .collect()
    }

    /// Case-insensitive substring search over name, tag and category.
    ///
    /// A blank query matches nothing rather than everything.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&Product> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.products
            .iter()
            .filter(|p| p.matches_lowercase(&needle))
            .collect()
    }

    /// A carousel page of up to `per_page` products starting at `offset`.
    ///
    /// Offsets past the end wrap to the first page; a `per_page` of zero is
    /// treated as [`DEFAULT_PAGE_SIZE`]. Any `per_page` is accepted; pages
    /// larger than the catalog return everything from `offset` on.
    #[must_use]
    pub fn page(&self, offset: usize, per_page: usize) -> CatalogPage<'_> {
        let total = self.products.len();
        let per_page = if per_page == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            per_page
        };
        let offset = if offset >= total { 0 } else { offset };

        let end = offset.saturating_add(per_page);
        let next_offset = if end >= total { 0 } else { end };
        let previous_offset = offset
            .checked_sub(per_page)
            .unwrap_or_else(|| total.saturating_sub(per_page));

        CatalogPage {
            products: self.products.iter().skip(offset).take(per_page).collect(),
            offset,
            next_offset,
            previous_offset,
            total,
        }
    }
}
