//! Core types for RocketCart.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod product;

pub use id::*;
pub use price::{Price, format_price};
pub use product::{CatalogProduct, Product, StockRecord, cart_size, cart_size_label, cart_total};
