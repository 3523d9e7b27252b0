//! YLK Core - Shared types library.
//!
//! This crate provides the domain types used across the YLK storefront widget:
//! - `storefront` - Cart store, catalog store, views and the preview server
//! - `cli` - Terminal front end for the same widget
//!
//! # Architecture
//!
//! The core crate contains only types and pure helpers - no I/O, no storage
//! access, no HTTP clients. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Product ids, prices, catalog products and cart line items

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
