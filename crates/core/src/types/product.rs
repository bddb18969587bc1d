//! Catalog product record.

use serde::{Deserialize, Serialize};

use super::{Category, Price, ProductTag, ShoeSize};

/// A sneaker listed in the catalog.
///
/// Products are defined at build time and never mutated. The cart copies
/// `name` and `price` when an item is added, so later catalog edits do not
/// reach items already in a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Display name, e.g. "Nike Dunk Low Panda".
    pub name: String,
    /// Unique identifier.
    pub tag: ProductTag,
    /// Unit price.
    pub price: Price,
    /// Default size shown on the listing.
    pub size: ShoeSize,
    /// Image path relative to the site root, e.g. `/img/panda.png`.
    pub image: String,
    /// Shop section.
    pub category: Category,
}

impl Product {
    /// Whether `needle` (already lowercased) occurs in the name, tag or
    /// category of this product.
    #[must_use]
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.tag.as_str().contains(needle)
            || self.category.as_str().contains(needle)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn panda() -> Product {
        serde_json::from_str(
            r#"{
                "name": "Nike Dunk Low Panda",
                "tag": "panda",
                "price": 150,
                "size": 11,
                "image": "/img/panda.png",
                "category": "nike"
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_deserialize() {
        let product = panda();
        assert_eq!(product.tag.as_str(), "panda");
        assert_eq!(product.price, Price::from_dollars(150));
        assert_eq!(product.size.to_string(), "11");
        assert_eq!(product.category, Category::Nike);
    }

    #[test]
    fn test_matches_any_field() {
        let product = panda();
        assert!(product.matches_lowercase("dunk"));
        assert!(product.matches_lowercase("pand"));
        assert!(product.matches_lowercase("nik"));
        assert!(!product.matches_lowercase("jordan"));
    }
}
