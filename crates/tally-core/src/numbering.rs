//! # Invoice Numbering
//!
//! Invoice numbers look like `INV-202610-0042`:
//!
//! ```text
//! INV - 2026 10 - 0042
//!        │    │     │
//!        │    │     └── existing invoice count + 1 (global, not reset monthly)
//!        │    └──────── month of issue, 2 digits
//!        └───────────── year of issue
//! ```
//!
//! The sequence comes from a count of existing invoices, which is only safe
//! when the count is read under the same write lock as the insert. The store
//! additionally enforces `UNIQUE(invoice_number)`; see `tally-db`'s engine.

use chrono::{DateTime, Datelike, Utc};

/// Prefix shared by every invoice number.
pub const INVOICE_NUMBER_PREFIX: &str = "INV";

/// Derives the next invoice number from the number of invoices already stored.
///
/// Sequences past 9999 simply grow wider (`INV-202610-10000`).
///
/// ## Example
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use tally_core::next_invoice_number;
///
/// let now = Utc.with_ymd_and_hms(2026, 3, 15, 10, 0, 0).unwrap();
/// assert_eq!(next_invoice_number(0, now), "INV-202603-0001");
/// assert_eq!(next_invoice_number(41, now), "INV-202603-0042");
/// ```
pub fn next_invoice_number(existing_count: i64, now: DateTime<Utc>) -> String {
    format!(
        "{}-{}{:02}-{:04}",
        INVOICE_NUMBER_PREFIX,
        now.year(),
        now.month(),
        existing_count + 1
    )
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    #[test]
    fn test_first_invoice() {
        let now = Utc.with_ymd_and_hms(2026, 10, 18, 9, 30, 0).unwrap();
        assert_eq!(next_invoice_number(0, now), "INV-202610-0001");
    }

    #[test]
    fn test_sequence_does_not_reset_per_month() {
        let october = Utc.with_ymd_and_hms(2026, 10, 31, 23, 59, 59).unwrap();
        let november = Utc.with_ymd_and_hms(2026, 11, 1, 0, 0, 0).unwrap();

        assert_eq!(next_invoice_number(7, october), "INV-202610-0008");
        assert_eq!(next_invoice_number(8, november), "INV-202611-0009");
    }

    #[test]
    fn test_sequence_widens_past_four_digits() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(next_invoice_number(9_998, now), "INV-202601-9999");
        assert_eq!(next_invoice_number(9_999, now), "INV-202601-10000");
    }

    proptest! {
        #[test]
        fn distinct_counts_give_distinct_numbers(a in 0i64..1_000_000, b in 0i64..1_000_000) {
            let now = Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap();
            prop_assert_eq!(a == b, next_invoice_number(a, now) == next_invoice_number(b, now));
        }
    }
}
