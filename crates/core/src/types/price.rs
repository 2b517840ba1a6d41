//! Type-safe price representation using decimal arithmetic.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Symbol placed before every amount. The store only sells in rupees.
pub const CURRENCY_SYMBOL: &str = "Rs.";

/// A price in the store currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in rupees, not paisa.
    pub amount: Decimal,
}

impl Price {
    /// Create a price in the store currency.
    #[must_use]
    pub const fn store(amount: Decimal) -> Self {
        Self { amount }
    }

    /// Format for display, e.g. `Rs. 120.00`.
    #[must_use]
    pub fn display(&self) -> String {
        format!("{CURRENCY_SYMBOL} {:.2}", self.amount.round_dp(2))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_pads_two_places() {
        assert_eq!(Price::store(Decimal::new(120, 0)).display(), "Rs. 120.00");
        assert_eq!(Price::store(Decimal::new(2400, 2)).display(), "Rs. 24.00");
    }

    #[test]
    fn test_display_rounds_extra_places() {
        let price = Price::store(Decimal::new(19_999, 3));
        assert_eq!(price.to_string(), "Rs. 20.00");
    }

    #[test]
    fn test_zero_display() {
        assert_eq!(Price::store(Decimal::ZERO).display(), "Rs. 0.00");
    }
}
