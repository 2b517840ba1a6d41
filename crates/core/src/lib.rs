//! AquaCafe Core - Storefront domain library.
//!
//! This crate holds everything the storefront knows about plants and carts
//! that does not involve I/O:
//!
//! - [`catalog`] - The seeded plant catalog and category filtering
//! - [`cart`] - Cart state transitions and derived totals
//! - [`view`] - The three top-level pages
//! - [`carousel`] - Image rotation pointer for product cards
//! - [`types`] - Newtype wrappers for product IDs and prices
//!
//! # Architecture
//!
//! No database access, no HTTP clients, no sessions. Cart operations take a
//! cart by value and hand back the next one, so the web layer decides where
//! the state lives and what side effects (opening the drawer) follow.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod carousel;
pub mod cart;
pub mod catalog;
pub mod types;
pub mod view;

pub use carousel::Carousel;
pub use cart::{Cart, CartLine};
pub use catalog::{
    CareLevel, Catalog, Category, CategoryFilter, LightRequirement, Product, UnknownCategory,
    filter_by_category,
};
pub use types::*;
pub use view::{UnknownView, View};
