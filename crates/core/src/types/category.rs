//! Product categories.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when a string names no known [`Category`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown category: {0}")]
pub struct CategoryError(pub String);

/// The shop section a product is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Nike,
    Jordan,
    Yeezy,
}

impl Category {
    /// All categories, in shop navigation order.
    pub const ALL: [Self; 3] = [Self::Nike, Self::Jordan, Self::Yeezy];

    /// The lowercase slug used in URLs and persisted data.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Nike => "nike",
            Self::Jordan => "jordan",
            Self::Yeezy => "yeezy",
        }
    }

    /// Parse a category slug, ignoring case and surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`CategoryError`] if the slug is not a known category.
    pub fn parse(s: &str) -> Result<Self, CategoryError> {
        let slug = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(slug))
            .ok_or_else(|| CategoryError(slug.to_string()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!(Category::parse("Jordan").unwrap(), Category::Jordan);
        assert_eq!(Category::parse(" YEEZY ").unwrap(), Category::Yeezy);
    }

    #[test]
    fn test_parse_unknown() {
        let err = Category::parse("adidas").unwrap_err();
        assert_eq!(err.to_string(), "unknown category: adidas");
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Category::Nike).unwrap(), "\"nike\"");
        let parsed: Category = serde_json::from_str("\"yeezy\"").unwrap();
        assert_eq!(parsed, Category::Yeezy);
    }
}
