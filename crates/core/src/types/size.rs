//! Shoe size with half-size granularity.

use core::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Errors that can occur when parsing a [`ShoeSize`].
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SizeError {
    /// The value is not a finite number.
    #[error("size must be a finite number")]
    NotFinite,
    /// The value is outside the supported range.
    #[error("size must be between {min} and {max} (got {value})")]
    OutOfRange {
        /// Smallest allowed size.
        min: f64,
        /// Largest allowed size.
        max: f64,
        /// The rejected value.
        value: f64,
    },
    /// The value is not a whole or half size.
    #[error("size must be a whole or half size (got {0})")]
    NotHalfStep(f64),
}

/// A US shoe size such as `9` or `9.5`.
///
/// Stored as a count of half sizes so that sizes compare and hash exactly;
/// serialized as a plain JSON number.
///
/// ## Examples
///
/// ```
/// use sneakerhub_core::ShoeSize;
///
/// let size = ShoeSize::from_f64(9.5).unwrap();
/// assert_eq!(size.to_string(), "9.5");
/// assert_eq!(ShoeSize::from_f64(11.0).unwrap().to_string(), "11");
/// assert!(ShoeSize::from_f64(9.25).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShoeSize(u16);

impl ShoeSize {
    /// Smallest size carried by the store.
    pub const MIN: f64 = 1.0;
    /// Largest size carried by the store.
    pub const MAX: f64 = 22.0;

    /// Parse a size from a floating point value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not finite, is outside
    /// [`Self::MIN`]..=[`Self::MAX`], or is not a multiple of one half.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_f64(value: f64) -> Result<Self, SizeError> {
        if !value.is_finite() {
            return Err(SizeError::NotFinite);
        }

        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(SizeError::OutOfRange {
                min: Self::MIN,
                max: Self::MAX,
                value,
            });
        }

        let halves = value * 2.0;
        if (halves - halves.round()).abs() > f64::EPSILON {
            return Err(SizeError::NotHalfStep(value));
        }

        // Range check above keeps this well inside u16.
        Ok(Self(halves.round() as u16))
    }

    /// The size as a floating point value.
    #[must_use]
    pub fn as_f64(self) -> f64 {
        f64::from(self.0) / 2.0
    }

    /// Whether this is a half size (e.g. `9.5`).
    #[must_use]
    pub const fn is_half(self) -> bool {
        self.0 % 2 == 1
    }
}

impl fmt::Display for ShoeSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / 2;
        if self.is_half() {
            write!(f, "{whole}.5")
        } else {
            write!(f, "{whole}")
        }
    }
}

impl std::str::FromStr for ShoeSize {
    type Err = SizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim().parse::<f64>().map_err(|_| SizeError::NotFinite)?;
        Self::from_f64(value)
    }
}

impl Serialize for ShoeSize {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

impl<'de> Deserialize<'de> for ShoeSize {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Self::from_f64(value).map_err(serde::de::Error::custom)
    }
}
