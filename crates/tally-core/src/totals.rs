//! # Totals Calculator
//!
//! Pure function from invoice lines to subtotal, tax and total.
//!
//! ```text
//! lines ──► Σ unit_price × qty ──► subtotal ──► × 18% (half up) ──► tax
//!                                      │                             │
//!                                      └──────────── + ──────────────┴──► total
//! ```
//!
//! Every step is integer cents, so recomputing totals from a stored
//! invoice's lines reproduces the stored numbers exactly. Amounts that do
//! not fit in an `i64` are rejected as `OutOfRange`, never wrapped.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{InvoiceLineItem, TaxRate};
use crate::INVOICE_TAX_RATE;

/// Monetary totals of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceTotals {
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
}

impl InvoiceTotals {
    /// Totals for `(unit_price, quantity)` pairs at `rate`.
    pub fn from_lines<I>(lines: I, rate: TaxRate) -> CoreResult<Self>
    where
        I: IntoIterator<Item = (Money, i64)>,
    {
        let line_totals = lines
            .into_iter()
            .map(|(unit_price, quantity)| line_total(unit_price, quantity))
            .collect::<CoreResult<Vec<_>>>()?;

        Self::from_line_totals(line_totals, rate)
    }

    /// Totals for already-multiplied line totals at `rate`.
    pub fn from_line_totals<I>(line_totals: I, rate: TaxRate) -> CoreResult<Self>
    where
        I: IntoIterator<Item = Money>,
    {
        let subtotal = line_totals
            .into_iter()
            .try_fold(Money::zero(), |acc, line| acc.checked_add(line))
            .ok_or_else(|| amount_out_of_range("subtotal"))?;
        let tax = subtotal.calculate_tax(rate);
        let total = subtotal
            .checked_add(tax)
            .ok_or_else(|| amount_out_of_range("total"))?;

        Ok(InvoiceTotals { subtotal, tax, total })
    }
}

/// `unit_price × quantity`, rejecting results that overflow.
pub fn line_total(unit_price: Money, quantity: i64) -> CoreResult<Money> {
    unit_price
        .checked_multiply_quantity(quantity)
        .ok_or_else(|| amount_out_of_range("line_total"))
}

fn amount_out_of_range(field: &str) -> CoreError {
    ValidationError::OutOfRange {
        field: field.to_string(),
        min: 0,
        max: i64::MAX,
    }
    .into()
}

/// Computes invoice totals at the fixed invoice tax rate.
///
/// ## Example
/// ```rust
/// use tally_core::{compute_totals, InvoiceLineItem};
///
/// let line = InvoiceLineItem {
///     id: "li-1".into(),
///     invoice_id: "inv-1".into(),
///     line_no: 1,
///     product_id: "p1".into(),
///     sku_snapshot: "P1".into(),
///     name_snapshot: "Widget".into(),
///     quantity: 3,
///     unit_price_cents: 10_000,
///     line_total_cents: 30_000,
/// };
///
/// let totals = compute_totals(&[line]).unwrap();
/// assert_eq!(totals.subtotal.to_string(), "300.00");
/// assert_eq!(totals.tax.to_string(), "54.00");
/// assert_eq!(totals.total.to_string(), "354.00");
/// ```
pub fn compute_totals(items: &[InvoiceLineItem]) -> CoreResult<InvoiceTotals> {
    InvoiceTotals::from_lines(
        items.iter().map(|item| (item.unit_price(), item.quantity)),
        INVOICE_TAX_RATE,
    )
}

// =============================================================================
// Unit Tests
// =============================================================================
