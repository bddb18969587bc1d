//! Sneakerhub Core - Shared types library.
//!
//! This crate provides the domain types used by the storefront: product tags,
//! categories, shoe sizes, prices and the catalog product record.
//!
//! # Architecture
//!
//! The core crate contains only types and parsing - no I/O, no storage, no
//! HTTP. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for tags, prices, sizes and categories

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
