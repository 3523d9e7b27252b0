//! YLK storefront widget library.
//!
//! The product grid, detail panel and cart drawer of a static storefront,
//! with the cart persisted to a local storage area. Front ends (the preview
//! server in this crate, the `ylk` CLI) drive an [`context::AppContext`] with
//! gestures and render its [`view`]s.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod context;
pub mod error;
mod filters;
pub mod interaction;
pub mod render;
pub mod routes;
pub mod signal;
pub mod state;
pub mod storage;
pub mod view;
