//! Shopping cart state transitions.
//!
//! A [`Cart`] is an insertion-ordered list of [`CartLine`]s with at most one
//! line per product. Every operation takes the cart by value and returns the
//! next cart; none of them fail. Unknown product ids are no-ops.
//!
//! Totals are derived on every call and never stored, so they cannot go
//! stale.
//!
//! ```
//! use aquacafe_core::{Cart, Catalog, ProductId};
//!
//! let catalog = Catalog::seeded();
//! let nana = &catalog.list_all()[0];
//!
//! let cart = Cart::new().add_item(nana).add_item(nana);
//! assert_eq!(cart.lines().len(), 1);
//! assert_eq!(cart.item_count(), 2);
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::types::{Price, ProductId};

/// One product and how many of it are in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product: Product,
    /// Always at least 1.
    pub quantity: u32,
}

impl CartLine {
    /// Price multiplied by quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product.price * Decimal::from(self.quantity)
    }

    /// Line total for display.
    #[must_use]
    pub fn line_price(&self) -> Price {
        Price::store(self.line_total())
    }
}

/// The shopping cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Add one unit of `product`.
    ///
    /// Increments the existing line for the product, or appends a new line
    /// with quantity 1. Other lines and their order are untouched.
    #[must_use]
    pub fn add_item(mut self, product: &Product) -> Self {
        match self.lines.iter_mut().find(|l| l.product.id == product.id) {
            Some(line) => line.quantity = line.quantity.saturating_add(1),
            None => self.lines.push(CartLine {
                product: product.clone(),
                quantity: 1,
            }),
        }
        self
    }

    /// Shift a line's quantity by `delta`, never going below 1.
    ///
    /// Use [`Cart::remove_item`] to drop a line entirely.
    #[must_use]
    pub fn update_quantity(mut self, product_id: &ProductId, delta: i64) -> Self {
        if let Some(line) = self.line_mut(product_id) {
            let next = i64::from(line.quantity).saturating_add(delta).max(1);
            line.quantity = u32::try_from(next).unwrap_or(u32::MAX);
        }
        self
    }

    /// Drop the line for `product_id`.
    #[must_use]
    pub fn remove_item(mut self, product_id: &ProductId) -> Self {
        self.lines.retain(|l| &l.product.id != product_id);
        self
    }

    /// Sum of price × quantity over all lines.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Subtotal for display.
    #[must_use]
    pub fn subtotal_price(&self) -> Price {
        Price::store(self.subtotal())
    }

    /// Sum of quantities over all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0u32, |acc, l| acc.saturating_add(l.quantity))
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The line for `product_id`, if present.
    #[must_use]
    pub fn line(&self, product_id: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|l| &l.product.id == product_id)
    }

    /// Product names in cart order.
    #[must_use]
    pub fn item_names(&self) -> Vec<String> {
        self.lines.iter().map(|l| l.product.name.clone()).collect()
    }

    fn line_mut(&mut self, product_id: &ProductId) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|l| &l.product.id == product_id)
    }
}
