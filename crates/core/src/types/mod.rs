//! Core types for the YLK storefront.
//!
//! This module provides type-safe wrappers for the catalog and cart domain.

pub mod cart;
pub mod id;
pub mod price;
pub mod product;

pub use cart::{CartLineItem, subtotal, total_count};
pub use id::*;
pub use price::{CurrencyCode, Price};
pub use product::{
    DEFAULT_IMAGE, DEFAULT_OPTION_NAME, MAX_UNIT_PRICE, Product, ProductError, ProductOption,
};
