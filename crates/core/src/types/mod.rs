//! Core types for Sneakerhub.
//!
//! This module provides type-safe wrappers for the storefront's domain concepts.

pub mod category;
pub mod price;
pub mod product;
pub mod size;
pub mod tag;

pub use category::{Category, CategoryError};
pub use price::{Price, PriceError};
pub use product::Product;
pub use size::{ShoeSize, SizeError};
pub use tag::{ProductTag, TagError};
