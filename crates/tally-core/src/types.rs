//! # Domain Types
//!
//! Core domain types used throughout Tally.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │     Invoice     │   │ InvoiceLineItem │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  invoice_id     │       │
//! │  │  sku (business) │   │  invoice_number │   │  sku_snapshot   │       │
//! │  │  price_cents    │   │  status         │   │  name_snapshot  │       │
//! │  │  stock_quantity │   │  total_cents    │   │  unit_price     │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    TaxRate      │   │  InvoiceStatus  │   │ PaymentMethod   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  bps (u32)      │   │  Draft          │   │  Cash           │       │
//! │  │  1800 = 18%     │   │  Paid           │   │  Card           │       │
//! │  └─────────────────┘   │  Overdue        │   │  Upi            │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - Business ID: (sku, invoice_number) - human-readable

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreResult, ValidationError};
use crate::money::Money;
use crate::totals::InvoiceTotals;
use crate::validation;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// 1 basis point = 0.01% = 1/10000, so 1800 bps = 18%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

}

// =============================================================================
// Product
// =============================================================================

/// A product in the catalog, read by the invoice engine.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Stock Keeping Unit - business identifier.
    pub sku: String,

    /// Display name, copied onto invoice lines.
    pub name: String,

    pub description: Option<String>,

    /// Unit price in cents.
    pub price_cents: i64,

    /// Units currently available. Never negative.
    pub stock_quantity: i64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Builds a validated product with a fresh id.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::Product;
    ///
    /// let product = Product::new("WID-001", "Widget", 10_000, 5).unwrap();
    /// assert_eq!(product.price().to_string(), "100.00");
    ///
    /// assert!(Product::new("", "Widget", 10_000, 5).is_err());
    /// assert!(Product::new("WID-001", "Widget", -1, 5).is_err());
    /// ```
    pub fn new(
        sku: impl Into<String>,
        name: impl Into<String>,
        price_cents: i64,
        stock_quantity: i64,
    ) -> CoreResult<Self> {
        let sku = sku.into().trim().to_string();
        let name = name.into().trim().to_string();

        validation::validate_sku(&sku)?;
        validation::validate_product_name(&name)?;
        validation::validate_price_cents(price_cents)?;
        validation::validate_stock_quantity(stock_quantity)?;

        let now = Utc::now();
        Ok(Product {
            id: Uuid::new_v4().to_string(),
            sku,
            name,
            description: None,
            price_cents,
            stock_quantity,
            created_at: now,
            updated_at: now,
        })
    }

    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Whether `quantity` units can be taken from current stock.
    #[inline]
    pub fn can_fulfill(&self, quantity: i64) -> bool {
        self.stock_quantity >= quantity
    }
}

// =============================================================================
// Invoice Status
// =============================================================================

/// The status of an invoice.
///
/// The engine only ever writes `Draft` or `Paid`; `Overdue` is kept so rows
/// written by other tools still decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    /// Issued, not yet paid.
    #[default]
    Draft,
    /// Paid at creation time.
    Paid,
    Overdue,
}

// =============================================================================
// Payment Method
// =============================================================================

#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Card,
    Upi,
}

impl PaymentMethod {
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
            PaymentMethod::Upi => "upi",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cash" => Ok(PaymentMethod::Cash),
            "card" => Ok(PaymentMethod::Card),
            "upi" => Ok(PaymentMethod::Upi),
            _ => Err(ValidationError::NotAllowed {
                field: "payment_method".to_string(),
                allowed: vec!["cash".to_string(), "card".to_string(), "upi".to_string()],
            }),
        }
    }
}

// =============================================================================
// Requests
// =============================================================================

/// One requested (product, quantity) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItemRequest {
    pub product_id: String,
    pub quantity: i64,
}

impl LineItemRequest {
    pub fn new(product_id: impl Into<String>, quantity: i64) -> Self {
        LineItemRequest {
            product_id: product_id.into(),
            quantity,
        }
    }
}

/// Everything needed to create an invoice.
///
/// ## Paid vs. Draft
/// Status follows `mark_as_paid` only. A payment method without the flag is
/// recorded but leaves the invoice in `Draft`; the flag without a method is
/// rejected.
///
/// ## Example
/// ```rust
/// use tally_core::{CreateInvoiceRequest, LineItemRequest, PaymentMethod};
///
/// let request = CreateInvoiceRequest::new(vec![LineItemRequest::new("p1", 3)])
///     .customer("Acme Ltd")
///     .paid_with(PaymentMethod::Card);
///
/// assert!(request.mark_as_paid);
/// assert_eq!(request.payment_method, Some(PaymentMethod::Card));
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoiceRequest {
    #[serde(default)]
    pub customer_name: Option<String>,
    pub line_items: Vec<LineItemRequest>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub mark_as_paid: bool,
}

impl CreateInvoiceRequest {
    pub fn new(line_items: Vec<LineItemRequest>) -> Self {
        CreateInvoiceRequest {
            line_items,
            ..Default::default()
        }
    }

    pub fn customer(mut self, name: impl Into<String>) -> Self {
        self.customer_name = Some(name.into());
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Records a payment method without marking the invoice paid.
    pub fn payment_method(mut self, method: PaymentMethod) -> Self {
        self.payment_method = Some(method);
        self
    }

    /// Records the payment method and marks the invoice paid.
    pub fn paid_with(mut self, method: PaymentMethod) -> Self {
        self.payment_method = Some(method);
        self.mark_as_paid = true;
        self
    }
}

// =============================================================================
// Invoice Line Item
// =============================================================================

/// A line on an invoice.
/// Uses snapshot pattern to freeze product data at time of invoicing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceLineItem {
    pub id: String,
    pub invoice_id: String,
    /// 1-based position within the invoice.
    pub line_no: i64,
    pub product_id: String,
    /// SKU at time of invoicing (frozen).
    pub sku_snapshot: String,
    /// Product name at time of invoicing (frozen).
    pub name_snapshot: String,
    pub quantity: i64,
    /// Unit price in cents at time of invoicing (frozen).
    pub unit_price_cents: i64,
    /// unit_price × quantity.
    pub line_total_cents: i64,
}

impl InvoiceLineItem {
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }
}

// =============================================================================
// Invoice
// =============================================================================

/// A persisted invoice with its line items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: String,
    /// `INV-YYYYMM-NNNN`, unique.
    pub invoice_number: String,
    pub customer_name: String,
    pub status: InvoiceStatus,
    pub subtotal_cents: i64,
    pub tax_rate_bps: u32,
    pub tax_cents: i64,
    pub total_cents: i64,
    pub payment_method: Option<PaymentMethod>,
    #[ts(as = "String")]
    pub issued_at: DateTime<Utc>,
    pub notes: String,
    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    pub line_items: Vec<InvoiceLineItem>,
}

impl Invoice {
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }

    #[inline]
    pub fn tax(&self) -> Money {
        Money::from_cents(self.tax_cents)
    }

    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// The totals as stored on the invoice row.
    pub fn stored_totals(&self) -> InvoiceTotals {
        InvoiceTotals {
            subtotal: self.subtotal(),
            tax: self.tax(),
            total: self.total(),
        }
    }
}

// =============================================================================
// Invoice Summary
// =============================================================================

/// One row of an invoice listing.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceSummary {
    pub id: String,
    pub invoice_number: String,
    pub customer_name: String,
    pub status: InvoiceStatus,
    pub total_cents: i64,
    pub payment_method: Option<PaymentMethod>,
    #[ts(as = "String")]
    pub issued_at: DateTime<Utc>,
    pub item_count: i64,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_rate_from_bps() {
        let rate = TaxRate::from_bps(1800);
        assert_eq!(rate.bps(), 1800);
    }

    #[test]
    fn test_invoice_status_default() {
        assert_eq!(InvoiceStatus::default(), InvoiceStatus::Draft);
    }

    #[test]
    fn test_payment_method_parse() {
        assert_eq!("card".parse::<PaymentMethod>().unwrap(), PaymentMethod::Card);
        assert_eq!(" UPI ".parse::<PaymentMethod>().unwrap(), PaymentMethod::Upi);
        assert!(matches!(
            "cheque".parse::<PaymentMethod>(),
            Err(ValidationError::NotAllowed { .. })
        ));
        assert_eq!(PaymentMethod::Cash.to_string(), "cash");
    }

    #[test]
    fn test_product_new_trims_and_validates() {
        let product = Product::new("  WID-001 ", " Widget ", 10_000, 5).unwrap();
        assert_eq!(product.sku, "WID-001");
        assert_eq!(product.name, "Widget");
        assert!(product.can_fulfill(5));
        assert!(!product.can_fulfill(6));

        assert!(Product::new("WID-001", "Widget", 100, -1).is_err());
        assert!(Product::new("WID 001", "Widget", 100, 1).is_err());
    }

    #[test]
    fn test_request_builders() {
        let request = CreateInvoiceRequest::new(vec![LineItemRequest::new("p1", 1)])
            .notes("thanks")
            .payment_method(PaymentMethod::Cash);

        assert_eq!(request.notes.as_deref(), Some("thanks"));
        assert_eq!(request.payment_method, Some(PaymentMethod::Cash));
        assert!(!request.mark_as_paid);
    }

    #[test]
    fn test_request_deserializes_with_defaults() {
        let json = r#"{"lineItems":[{"productId":"p1","quantity":3}]}"#;
        let request: CreateInvoiceRequest = serde_json::from_str(json).unwrap();

        assert_eq!(request.line_items, vec![LineItemRequest::new("p1", 3)]);
        assert!(request.customer_name.is_none());
        assert!(request.payment_method.is_none());
        assert!(!request.mark_as_paid);
    }

    #[test]
    fn test_invoice_serializes_camel_case() {
        let invoice = Invoice {
            id: "inv-1".to_string(),
            invoice_number: "INV-202610-0001".to_string(),
            customer_name: "Walk-in Customer".to_string(),
            status: InvoiceStatus::Paid,
            subtotal_cents: 30_000,
            tax_rate_bps: 1800,
            tax_cents: 5_400,
            total_cents: 35_400,
            payment_method: Some(PaymentMethod::Card),
            issued_at: Utc::now(),
            notes: String::new(),
            line_items: Vec::new(),
        };

        let value = serde_json::to_value(&invoice).unwrap();
        assert_eq!(value["invoiceNumber"], "INV-202610-0001");
        assert_eq!(value["status"], "paid");
        assert_eq!(value["paymentMethod"], "card");
        assert_eq!(value["totalCents"], 35_400);
    }
}
