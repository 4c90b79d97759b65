//! Type-safe price representation using decimal arithmetic.

use std::fmt;
use std::ops::Mul;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A catalog price.
///
/// Serialized as a plain JSON number (`179.9`) so stored carts keep the same
/// shape as the catalog payloads they were built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Price {
    /// Zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from an amount in cents.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl Mul<i64> for Price {
    type Output = Self;

    fn mul(self, rhs: i64) -> Self {
        Self(self.0 * Decimal::from(rhs))
    }
}

impl std::iter::Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Self(iter.map(|p| p.0).sum())
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0.round_dp(2))
    }
}

/// Format a price for display (e.g. `$179.90`).
#[must_use]
pub fn format_price(price: Price) -> String {
    format!("${price}")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_price_deserializes_from_json_number() {
        let price: Price = serde_json::from_str("179.9").unwrap();
        assert_eq!(price, Price::from_cents(17990));
    }

    #[test]
    fn test_price_serializes_as_json_number() {
        let json = serde_json::to_string(&Price::from_cents(13990)).unwrap();
        assert_eq!(json, "139.9");
    }

    #[test]
    fn test_format_price_two_decimals() {
        assert_eq!(format_price(Price::from_cents(17990)), "$179.90");
        assert_eq!(format_price(Price::ZERO), "$0.00");
    }

    #[test]
    fn test_price_multiplication_and_sum() {
        let total: Price = [Price::from_cents(1000) * 3, Price::from_cents(250)]
            .into_iter()
            .sum();
        assert_eq!(total, Price::from_cents(3250));
    }
}
