//! Product tag type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`ProductTag`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TagError {
    /// The input string is empty (or only whitespace).
    #[error("tag cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("tag must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a character outside `[a-z0-9_-]`.
    #[error("tag contains invalid character {0:?}")]
    InvalidChar(char),
}

/// Unique product identifier, used as the cart's mapping key.
///
/// Tags are case-insensitive: parsing folds ASCII letters to lowercase, so
/// `"Panda"` and `"panda"` name the same product and the same cart entry.
///
/// ## Constraints
///
/// - Length: 1-64 characters after trimming surrounding whitespace
/// - Characters: ASCII letters, digits, `-` and `_`
///
/// ## Examples
///
/// ```
/// use sneakerhub_core::ProductTag;
///
/// let tag = ProductTag::parse("Panda").unwrap();
/// assert_eq!(tag.as_str(), "panda");
///
/// assert!(ProductTag::parse("").is_err());
/// assert!(ProductTag::parse("two words").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProductTag(String);

impl ProductTag {
    /// Maximum length of a tag.
    pub const MAX_LENGTH: usize = 64;

    /// Parse a `ProductTag` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is empty, longer than
    /// [`Self::MAX_LENGTH`], or contains characters other than ASCII
    /// alphanumerics, `-` and `_`.
    pub fn parse(s: &str) -> Result<Self, TagError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(TagError::Empty);
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(TagError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if let Some(c) = s
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(TagError::InvalidChar(c));
        }

        Ok(Self(s.to_ascii_lowercase()))
    }

    /// Returns the tag as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for ProductTag {
    type Err = TagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ProductTag {
    type Error = TagError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ProductTag> for String {
    fn from(tag: ProductTag) -> Self {
        tag.0
    }
}

impl AsRef<str> for ProductTag {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_folds_case() {
        let tag = ProductTag::parse("SeaFoam").unwrap();
        assert_eq!(tag.as_str(), "seafoam");
        assert_eq!(tag, ProductTag::parse("seafoam").unwrap());
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert_eq!(ProductTag::parse("  kd ").unwrap().as_str(), "kd");
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(ProductTag::parse(""), Err(TagError::Empty));
        assert_eq!(ProductTag::parse("   "), Err(TagError::Empty));
    }

    #[test]
    fn test_parse_too_long() {
        let long = "a".repeat(65);
        assert!(matches!(
            ProductTag::parse(&long),
            Err(TagError::TooLong { max: 64 })
        ));
    }

    #[test]
    fn test_parse_invalid_char() {
        assert_eq!(
            ProductTag::parse("air max"),
            Err(TagError::InvalidChar(' '))
        );
        assert_eq!(ProductTag::parse("kd/15"), Err(TagError::InvalidChar('/')));
    }

    #[test]
    fn test_serde_as_map_key() {
        let mut map = std::collections::BTreeMap::new();
        map.insert(ProductTag::parse("panda").unwrap(), 1);
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"panda":1}"#);

        let parsed: std::collections::BTreeMap<ProductTag, i32> =
            serde_json::from_str(r#"{"PANDA":1}"#).unwrap();
        assert!(parsed.contains_key(&ProductTag::parse("panda").unwrap()));
    }

    #[test]
    fn test_deserialize_rejects_invalid() {
        assert!(serde_json::from_str::<ProductTag>(r#""""#).is_err());
        assert!(serde_json::from_str::<ProductTag>(r#""a b""#).is_err());
    }
}
