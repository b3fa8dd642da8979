//! # Invoice Engine
//!
//! Creates invoices: validates stock against aggregated demand, computes
//! totals, assigns the next invoice number, and writes the invoice, its line
//! items and the stock decrements as one transaction.
//!
//! ## Create Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  create_invoice(request)                                                │
//! │                                                                         │
//! │  1. Request checks (no I/O)                                             │
//! │     empty? quantity range? customer/notes length? paid needs method?   │
//! │                                                                         │
//! │  2. Catalog snapshot + check_stock + totals (pool read, no writes)      │
//! │     fast rejection: ProductNotFound / InsufficientStock                 │
//! │                                                                         │
//! │  3. BEGIN                                                               │
//! │     ├── UPDATE products SET stock -= n WHERE stock >= n   (per product) │
//! │     │     first statement → takes the write lock                        │
//! │     │     0 rows → re-read → InsufficientStock / ProductNotFound        │
//! │     ├── SELECT COUNT(*) FROM invoices → INV-YYYYMM-NNNN                 │
//! │     ├── INSERT invoices          (UNIQUE invoice_number)                │
//! │     └── INSERT invoice_line_items (one per request line)                │
//! │     COMMIT                                                              │
//! │                                                                         │
//! │  Any failure inside 3 → ROLLBACK, error returned, nothing persisted.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Concurrent engines on the same database are serialized by SQLite's write
//! lock (writers wait up to the configured busy timeout). The engine never
//! retries; [`InvoiceError::is_retryable`] tells callers when resubmitting
//! the same request can succeed.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info, warn};
use uuid::Uuid;

use tally_core::stock::{aggregate_demand, validate_requests};
use tally_core::validation::{normalize_customer_name, normalize_notes};
use tally_core::{
    check_stock, next_invoice_number, Clock, CreateInvoiceRequest, Invoice, InvoiceLineItem,
    InvoiceStatus, InvoiceTotals, PaymentMethod, ValidatedInvoice, ValidationError,
    INVOICE_TAX_RATE,
};

use crate::error::{DbError, InvoiceError};
use crate::repository::invoice::InvoiceRepository;
use crate::repository::product::ProductRepository;

/// A request that passed every check that can run outside the transaction.
#[derive(Debug)]
struct PreparedInvoice {
    customer_name: String,
    notes: String,
    payment_method: Option<PaymentMethod>,
    status: InvoiceStatus,
    validated: ValidatedInvoice,
    totals: InvoiceTotals,
}

/// Creates invoices atomically against a SQLite catalog.
///
/// ## Usage
/// ```rust,ignore
/// let engine = db.invoice_engine();
///
/// let request = CreateInvoiceRequest::new(vec![LineItemRequest::new(product_id, 3)])
///     .customer("Acme Ltd")
///     .paid_with(PaymentMethod::Card);
///
/// let invoice = engine.create_invoice(request).await?;
/// println!("{} total {}", invoice.invoice_number, invoice.total());
/// ```
#[derive(Debug, Clone)]
pub struct InvoiceEngine {
    pool: SqlitePool,
    clock: Arc<dyn Clock>,
}

impl InvoiceEngine {
    pub fn new(pool: SqlitePool, clock: Arc<dyn Clock>) -> Self {
        InvoiceEngine { pool, clock }
    }

    /// Creates and persists an invoice.
    ///
    /// ## Returns
    /// * `Ok(Invoice)` - the committed invoice with its line items in request order
    /// * `Err(InvoiceError)` - nothing was written
    pub async fn create_invoice(
        &self,
        request: CreateInvoiceRequest,
    ) -> Result<Invoice, InvoiceError> {
        let prepared = match self.prepare(&request).await {
            Ok(prepared) => prepared,
            Err(err) => {
                warn!(error = %err, "Invoice request rejected");
                return Err(err);
            }
        };

        let now = self.clock.now();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(format!("begin: {e}")))?;

        match write_invoice(&mut tx, &prepared, now).await {
            Ok(invoice) => {
                tx.commit()
                    .await
                    .map_err(|e| DbError::TransactionFailed(format!("commit: {e}")))?;

                info!(
                    invoice_id = %invoice.id,
                    invoice_number = %invoice.invoice_number,
                    status = ?invoice.status,
                    total_cents = invoice.total_cents,
                    line_count = invoice.line_items.len(),
                    "Invoice created"
                );
                Ok(invoice)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!(error = %rollback_err, "Rollback failed");
                }
                warn!(error = %err, "Invoice creation rolled back");
                Err(err)
            }
        }
    }

    /// Runs every check that needs no write lock.
    async fn prepare(&self, request: &CreateInvoiceRequest) -> Result<PreparedInvoice, InvoiceError> {
        validate_requests(&request.line_items)?;

        let customer_name = normalize_customer_name(request.customer_name.as_deref())?;
        let notes = normalize_notes(request.notes.as_deref())?;

        let status = match (request.mark_as_paid, request.payment_method) {
            (true, None) => {
                return Err(ValidationError::Required {
                    field: "payment_method".to_string(),
                }
                .into())
            }
            (true, Some(_)) => InvoiceStatus::Paid,
            (false, _) => InvoiceStatus::Draft,
        };

        let demand = aggregate_demand(&request.line_items)?;
        let ids: Vec<String> = demand.iter().map(|d| d.product_id.clone()).collect();

        debug!(products = ids.len(), lines = request.line_items.len(), "Validating stock");

        let catalog = ProductRepository::new(self.pool.clone())
            .get_many(&ids)
            .await?;
        let validated = check_stock(&request.line_items, demand, &catalog)?;
        let totals = validated.totals(INVOICE_TAX_RATE)?;

        Ok(PreparedInvoice {
            customer_name,
            notes,
            payment_method: request.payment_method,
            status,
            validated,
            totals,
        })
    }
}

/// The transactional part of invoice creation. The caller owns commit/rollback.
async fn write_invoice(
    conn: &mut SqliteConnection,
    prepared: &PreparedInvoice,
    now: DateTime<Utc>,
) -> Result<Invoice, InvoiceError> {
    // Stock first: the first write takes SQLite's write lock, so the count
    // below sees every invoice committed before us.
    for demand in &prepared.validated.demand {
        let reserved =
            ProductRepository::decrement_stock(conn, &demand.product_id, demand.quantity, now)
                .await?;

        if !reserved {
            return Err(
                match ProductRepository::get_by_id_in(conn, &demand.product_id).await? {
                    Some(product) => InvoiceError::InsufficientStock {
                        product_id: product.id,
                        product_name: product.name,
                        available: product.stock_quantity,
                        requested: demand.quantity,
                    },
                    None => InvoiceError::ProductNotFound(demand.product_id.clone()),
                },
            );
        }
    }

    let existing = InvoiceRepository::count_in(conn).await?;
    let invoice_number = next_invoice_number(existing, now);
    let totals = prepared.totals;
    let invoice_id = Uuid::new_v4().to_string();

    let line_items: Vec<InvoiceLineItem> = prepared
        .validated
        .lines
        .iter()
        .enumerate()
        .map(|(index, line)| InvoiceLineItem {
            id: Uuid::new_v4().to_string(),
            invoice_id: invoice_id.clone(),
            line_no: index as i64 + 1,
            product_id: line.product_id.clone(),
            sku_snapshot: line.sku.clone(),
            name_snapshot: line.name.clone(),
            quantity: line.quantity,
            unit_price_cents: line.unit_price.cents(),
            line_total_cents: line.line_total.cents(),
        })
        .collect();

    let invoice = Invoice {
        id: invoice_id,
        invoice_number,
        customer_name: prepared.customer_name.clone(),
        status: prepared.status,
        subtotal_cents: totals.subtotal.cents(),
        tax_rate_bps: INVOICE_TAX_RATE.bps(),
        tax_cents: totals.tax.cents(),
        total_cents: totals.total.cents(),
        payment_method: prepared.payment_method,
        issued_at: now,
        notes: prepared.notes.clone(),
        line_items,
    };

    InvoiceRepository::insert_invoice(conn, &invoice)
        .await
        .map_err(|err| {
            if err.is_unique_violation_on("invoices.invoice_number") {
                InvoiceError::InvoiceNumberConflict {
                    invoice_number: invoice.invoice_number.clone(),
                }
            } else {
                InvoiceError::TransactionFailure(err)
            }
        })?;

    for item in &invoice.line_items {
        InvoiceRepository::insert_line_item(conn, item).await?;
    }

    Ok(invoice)
}

// =============================================================================
// Unit Tests
// =============================================================================
