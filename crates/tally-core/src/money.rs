//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  With floats:                                                           │
//! │    0.1 + 0.2 = 0.30000000000000004                                      │
//! │    subtotal * 0.18, then toFixed(2), then re-summed → drift            │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    line total  = unit_cents × qty          (exact)                      │
//! │    subtotal    = Σ line totals             (exact)                      │
//! │    tax         = round(subtotal × bps)     (one rounding step)          │
//! │    total       = subtotal + tax            (exact)                      │
//! │                                                                         │
//! │  Recomputing from stored line items always yields the same numbers.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tally_core::money::Money;
//!
//! let price = Money::from_cents(10_000); // 100.00
//! let line_total = price.checked_multiply_quantity(3).unwrap();
//! assert_eq!(line_total.to_string(), "300.00");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents, paise, ...).
///
/// ## Where Money is Used
/// ```text
/// Product.price_cents ──► LineItem.unit_price ──► LineItem.line_total
///                                                        │
///                          Invoice.subtotal ◄────────────┘
///                                 │
///                                 ├──► calculate_tax(18%) ──► Invoice.tax
///                                 ▼
///                          Invoice.total = subtotal + tax
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // 10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion (truncated toward zero).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Calculates tax at `rate`, rounding half up to the nearest cent.
    ///
    /// ## Rounding
    /// ```text
    /// ┌─────────────────────────────────────────────────────────────────────┐
    /// │  ROUND HALF UP (on non-negative amounts)                            │
    /// │                                                                     │
    /// │  tax_cents = (amount_cents × bps + 5000) / 10000                    │
    /// │                                                                     │
    /// │  0.004 → 0.00    0.005 → 0.01    0.015 → 0.02    0.025 → 0.03      │
    /// │                                                                     │
    /// │  Integer only, so the same subtotal always yields the same tax.     │
    /// └─────────────────────────────────────────────────────────────────────┘
    /// ```
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::money::Money;
    /// use tally_core::types::TaxRate;
    ///
    /// let subtotal = Money::from_cents(30_000); // 300.00
    /// let tax = subtotal.calculate_tax(TaxRate::from_bps(1800));
    /// assert_eq!(tax.cents(), 5_400); // 54.00
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        // i128 keeps amount * bps from overflowing on large invoices
        let tax_cents = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_cents(tax_cents as i64)
    }

    /// Multiplies money by a quantity. `None` on overflow.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299);
    /// assert_eq!(unit_price.checked_multiply_quantity(3), Some(Money::from_cents(897)));
    /// assert_eq!(unit_price.checked_multiply_quantity(i64::MAX), None);
    /// ```
    #[inline]
    pub const fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Adds two amounts. `None` on overflow.
    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Renders as a plain two-decimal amount: `300.00`, `-5.50`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.minor(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(30_000).to_string(), "300.00");
        assert_eq!(Money::from_cents(500).to_string(), "5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::from_cents(7).to_string(), "0.07");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_checked_add() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!(a.checked_add(b), Some(Money::from_cents(1500)));
        assert_eq!(Money::from_cents(i64::MAX).checked_add(Money::from_cents(1)), None);
    }

    #[test]
    fn test_tax_at_invoice_rate() {
        let rate = TaxRate::from_bps(1800);
        assert_eq!(Money::from_cents(30_000).calculate_tax(rate).cents(), 5_400);
        assert_eq!(Money::zero().calculate_tax(rate).cents(), 0);
    }

    #[test]
    fn test_tax_rounds_half_up() {
        let rate = TaxRate::from_bps(1800);
        // 0.25 × 18% = 0.045 → 0.05
        assert_eq!(Money::from_cents(25).calculate_tax(rate).cents(), 5);
        // 0.22 × 18% = 0.0396 → 0.04
        assert_eq!(Money::from_cents(22).calculate_tax(rate).cents(), 4);
        // 0.02 × 18% = 0.0036 → 0.00
        assert_eq!(Money::from_cents(2).calculate_tax(rate).cents(), 0);
    }

    #[test]
    fn test_tax_does_not_overflow_on_large_amounts() {
        let huge = Money::from_cents(i64::MAX / 2);
        let tax = huge.calculate_tax(TaxRate::from_bps(1800));
        assert!(tax.cents() > 0);
    }

    #[test]
    fn test_checked_multiply_quantity() {
        assert_eq!(
            Money::from_cents(299).checked_multiply_quantity(3),
            Some(Money::from_cents(897))
        );
        assert_eq!(
            Money::zero().checked_multiply_quantity(i64::MAX),
            Some(Money::zero())
        );
        assert_eq!(Money::from_cents(2).checked_multiply_quantity(i64::MAX), None);
    }
}
