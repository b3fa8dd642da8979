//! # Stock Reservation Validator
//!
//! Checks a requested set of lines against catalog stock.
//!
//! ## Aggregated Demand
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Request: [{P1, 3}, {P2, 1}, {P1, 2}]        Stock: P1 = 4, P2 = 9     │
//! │                                                                         │
//! │  ❌ Per line:  3 ≤ 4 ✓   1 ≤ 9 ✓   2 ≤ 4 ✓   → accepted, oversold!    │
//! │                                                                         │
//! │  ✅ Aggregated: P1 = 3 + 2 = 5 > 4            → InsufficientStock       │
//! │                 P2 = 1     ≤ 9                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Validation reads a catalog snapshot through [`CatalogLookup`]; the store
//! re-checks stock atomically when it decrements, so this is the fast path
//! that rejects most bad requests before a transaction is opened.

use std::collections::HashMap;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::totals::{line_total, InvoiceTotals};
use crate::types::{LineItemRequest, Product, TaxRate};
use crate::validation::validate_quantity;

// =============================================================================
// Catalog Lookup
// =============================================================================

/// Read-only product lookup by identifier.
pub trait CatalogLookup {
    fn product(&self, product_id: &str) -> Option<&Product>;
}

impl CatalogLookup for HashMap<String, Product> {
    fn product(&self, product_id: &str) -> Option<&Product> {
        self.get(product_id)
    }
}

impl CatalogLookup for [Product] {
    fn product(&self, product_id: &str) -> Option<&Product> {
        self.iter().find(|p| p.id == product_id)
    }
}

impl CatalogLookup for Vec<Product> {
    fn product(&self, product_id: &str) -> Option<&Product> {
        self.as_slice().product(product_id)
    }
}

// =============================================================================
// Validated Output
// =============================================================================

/// Total quantity requested for one product across the whole request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDemand {
    pub product_id: String,
    pub quantity: i64,
}

/// A request line joined with the product data it will be invoiced at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedLine {
    pub product_id: String,
    pub sku: String,
    pub name: String,
    pub unit_price: Money,
    pub quantity: i64,
    pub line_total: Money,
}

/// Result of a successful stock check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedInvoice {
    /// One entry per request line, in request order.
    pub lines: Vec<ValidatedLine>,
    /// One entry per distinct product, in order of first appearance.
    pub demand: Vec<ProductDemand>,
}

impl ValidatedInvoice {
    pub fn totals(&self, rate: TaxRate) -> CoreResult<InvoiceTotals> {
        InvoiceTotals::from_line_totals(self.lines.iter().map(|line| line.line_total), rate)
    }
}

// =============================================================================
// Validation
// =============================================================================

/// Shape checks that need no catalog: non-empty, every quantity ≥ 1.
pub fn validate_requests(requests: &[LineItemRequest]) -> CoreResult<()> {
    if requests.is_empty() {
        return Err(CoreError::EmptyInvoice);
    }

    for request in requests {
        validate_quantity(request.quantity)?;
    }

    Ok(())
}

/// Sums requested quantities per product, keeping first-appearance order.
///
/// ## Example
/// ```rust
/// use tally_core::LineItemRequest;
/// use tally_core::stock::aggregate_demand;
///
/// let demand = aggregate_demand(&[
///     LineItemRequest::new("p1", 3),
///     LineItemRequest::new("p2", 1),
///     LineItemRequest::new("p1", 2),
/// ])
/// .unwrap();
///
/// assert_eq!(demand.len(), 2);
/// assert_eq!((demand[0].product_id.as_str(), demand[0].quantity), ("p1", 5));
/// assert_eq!((demand[1].product_id.as_str(), demand[1].quantity), ("p2", 1));
/// ```
pub fn aggregate_demand(requests: &[LineItemRequest]) -> CoreResult<Vec<ProductDemand>> {
    let mut demand: Vec<ProductDemand> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for request in requests {
        match index.get(request.product_id.as_str()) {
            Some(&i) => {
                demand[i].quantity = demand[i]
                    .quantity
                    .checked_add(request.quantity)
                    .ok_or_else(|| ValidationError::OutOfRange {
                        field: "quantity".to_string(),
                        min: 1,
                        max: i64::MAX,
                    })?;
            }
            None => {
                index.insert(&request.product_id, demand.len());
                demand.push(ProductDemand {
                    product_id: request.product_id.clone(),
                    quantity: request.quantity,
                });
            }
        }
    }

    Ok(demand)
}

/// Validates a request against current catalog stock.
///
/// ## Flow
/// ```text
/// requests ──► validate_requests ──► aggregate_demand ──► check_stock
/// ```
pub fn validate_stock<C>(requests: &[LineItemRequest], catalog: &C) -> CoreResult<ValidatedInvoice>
where
    C: CatalogLookup + ?Sized,
{
    validate_requests(requests)?;
    let demand = aggregate_demand(requests)?;
    check_stock(requests, demand, catalog)
}

/// Checks already-validated requests and their aggregated demand against
/// the catalog.
///
/// ```text
///                  for each distinct product
///              ┌── catalog.product(id) ── None ──► ProductNotFound
///              │
///              └── stock < demand ─────────────► InsufficientStock
///                                          │
///                  for each request line   ▼
///              unit_price × quantity overflows ─► OutOfRange
///                                          │
///                                          ▼
///              ValidatedInvoice { lines (per request), demand (per product) }
/// ```
pub fn check_stock<C>(
    requests: &[LineItemRequest],
    demand: Vec<ProductDemand>,
    catalog: &C,
) -> CoreResult<ValidatedInvoice>
where
    C: CatalogLookup + ?Sized,
{
    for wanted in &demand {
        let product = catalog
            .product(&wanted.product_id)
            .ok_or_else(|| CoreError::ProductNotFound(wanted.product_id.clone()))?;

        if !product.can_fulfill(wanted.quantity) {
            return Err(CoreError::InsufficientStock {
                product_id: product.id.clone(),
                product_name: product.name.clone(),
                available: product.stock_quantity,
                requested: wanted.quantity,
            });
        }
    }

    let lines = requests
        .iter()
        .map(|request| {
            // Every id was resolved in the demand loop above.
            let product = catalog
                .product(&request.product_id)
                .ok_or_else(|| CoreError::ProductNotFound(request.product_id.clone()))?;

            Ok(ValidatedLine {
                product_id: product.id.clone(),
                sku: product.sku.clone(),
                name: product.name.clone(),
                unit_price: product.price(),
                quantity: request.quantity,
                line_total: line_total(product.price(), request.quantity)?,
            })
        })
        .collect::<CoreResult<Vec<_>>>()?;

    Ok(ValidatedInvoice { lines, demand })
}

// =============================================================================
// Unit Tests
// =============================================================================
