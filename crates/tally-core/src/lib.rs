//! # tally-core: Pure Business Logic for Tally
//!
//! This crate is the **heart** of Tally. It contains the invoice math and
//! rules as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Tally Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Callers (CLI, HTTP layer, ...)                  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ CreateInvoiceRequest                   │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               tally-db (InvoiceEngine, repositories)            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ tally-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │  totals   │  │ numbering │  │   stock   │  │   │
//! │  │   │  Invoice  │  │ subtotal  │  │ INV-YYYY  │  │ aggregate │  │   │
//! │  │   │  Product  │  │ tax/total │  │  MM-NNNN  │  │  demand   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Invoice, line items, requests)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`totals`] - Subtotal / tax / total calculation
//! - [`numbering`] - Sequential invoice numbers
//! - [`stock`] - Demand aggregation and stock validation
//! - [`validation`] - Input validation rules
//! - [`clock`] - Time source abstraction
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use tally_core::money::Money;
//! use tally_core::INVOICE_TAX_RATE;
//!
//! let subtotal = Money::from_cents(30_000); // 300.00
//! let tax = subtotal.calculate_tax(INVOICE_TAX_RATE);
//!
//! assert_eq!(tax.cents(), 5_400); // 54.00
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod clock;
pub mod error;
pub mod money;
pub mod numbering;
pub mod stock;
pub mod totals;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use numbering::next_invoice_number;
pub use stock::{check_stock, validate_stock, CatalogLookup, ProductDemand, ValidatedInvoice, ValidatedLine};
pub use totals::{compute_totals, InvoiceTotals};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Tax rate applied to every invoice: 18% (GST).
pub const INVOICE_TAX_RATE: TaxRate = TaxRate::from_bps(1800);

/// Customer name used when the caller leaves it blank.
pub const DEFAULT_CUSTOMER_NAME: &str = "Walk-in Customer";

/// Maximum length of a customer name.
pub const MAX_CUSTOMER_NAME_LEN: usize = 200;

/// Maximum length of invoice notes.
pub const MAX_NOTES_LEN: usize = 2000;

/// Largest quantity a single line item may request.
pub const MAX_LINE_QUANTITY: i64 = 1_000_000;
