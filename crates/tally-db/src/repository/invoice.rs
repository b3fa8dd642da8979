//! # Invoice Repository
//!
//! Reads for invoices and their line items, plus the inserts the invoice
//! engine issues inside its transaction.
//!
//! ## Storage Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  invoices                          invoice_line_items                   │
//! │  ─────────────────────────         ─────────────────────────────────    │
//! │  id ◄───────────────────────────── invoice_id                          │
//! │  invoice_number (UNIQUE)           line_no (1..n, UNIQUE per invoice)  │
//! │  status, payment_method            product_id ──► products.id          │
//! │  subtotal / tax / total cents      sku_snapshot, name_snapshot         │
//! │  tax_rate_bps, issued_at, notes    quantity, unit/line cents           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Line items are always returned in `line_no` order, which is request order.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use tally_core::{Invoice, InvoiceLineItem, InvoiceSummary};

const INVOICE_COLUMNS: &str = "id, invoice_number, customer_name, status, subtotal_cents, \
     tax_rate_bps, tax_cents, total_cents, payment_method, issued_at, notes";

const LINE_ITEM_COLUMNS: &str = "id, invoice_id, line_no, product_id, sku_snapshot, \
     name_snapshot, quantity, unit_price_cents, line_total_cents";

/// Repository for invoice database operations.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    pool: SqlitePool,
}

impl InvoiceRepository {
    /// Creates a new InvoiceRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InvoiceRepository { pool }
    }

    /// Gets an invoice, with its line items, by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Invoice>> {
        let invoice = sqlx::query_as::<_, Invoice>(&format!(
            "SELECT {INVOICE_COLUMNS} FROM invoices WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        self.with_items(invoice).await
    }

    /// Gets an invoice, with its line items, by its number (`INV-202610-0001`).
    pub async fn get_by_number(&self, invoice_number: &str) -> DbResult<Option<Invoice>> {
        let invoice = sqlx::query_as::<_, Invoice>(&format!(
            "SELECT {INVOICE_COLUMNS} FROM invoices WHERE invoice_number = ?1"
        ))
        .bind(invoice_number.trim())
        .fetch_optional(&self.pool)
        .await?;

        self.with_items(invoice).await
    }

    /// Gets the line items of an invoice in line order.
    pub async fn get_items(&self, invoice_id: &str) -> DbResult<Vec<InvoiceLineItem>> {
        let items = sqlx::query_as::<_, InvoiceLineItem>(&format!(
            "SELECT {LINE_ITEM_COLUMNS} FROM invoice_line_items \
             WHERE invoice_id = ?1 ORDER BY line_no"
        ))
        .bind(invoice_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Lists invoices newest first.
    pub async fn list(&self, limit: u32) -> DbResult<Vec<InvoiceSummary>> {
        debug!(limit, "Listing invoices");

        let invoices = sqlx::query_as::<_, InvoiceSummary>(
            r#"
            SELECT
                i.id,
                i.invoice_number,
                i.customer_name,
                i.status,
                i.total_cents,
                i.payment_method,
                i.issued_at,
                (SELECT COUNT(*) FROM invoice_line_items li WHERE li.invoice_id = i.id)
                    AS item_count
            FROM invoices i
            ORDER BY i.issued_at DESC, i.rowid DESC
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(invoices)
    }

    /// Counts stored invoices.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM invoices")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn with_items(&self, invoice: Option<Invoice>) -> DbResult<Option<Invoice>> {
        match invoice {
            Some(mut invoice) => {
                invoice.line_items = self.get_items(&invoice.id).await?;
                Ok(Some(invoice))
            }
            None => Ok(None),
        }
    }

    // =========================================================================
    // Transaction-scoped operations
    // =========================================================================

    /// Counts invoices on an open connection or transaction.
    pub async fn count_in(conn: &mut SqliteConnection) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM invoices")
            .fetch_one(conn)
            .await?;

        Ok(count)
    }

    /// Inserts the invoice row. Line items are inserted separately.
    ///
    /// ## Errors
    /// * `DbError::UniqueViolation` on `invoices.invoice_number` when the
    ///   number is already taken.
    pub async fn insert_invoice(conn: &mut SqliteConnection, invoice: &Invoice) -> DbResult<()> {
        debug!(id = %invoice.id, invoice_number = %invoice.invoice_number, "Inserting invoice");

        sqlx::query(
            r#"
            INSERT INTO invoices (
                id, invoice_number, customer_name, status,
                subtotal_cents, tax_rate_bps, tax_cents, total_cents,
                payment_method, issued_at, notes
            ) VALUES (
                ?1, ?2, ?3, ?4,
                ?5, ?6, ?7, ?8,
                ?9, ?10, ?11
            )
            "#,
        )
        .bind(&invoice.id)
        .bind(&invoice.invoice_number)
        .bind(&invoice.customer_name)
        .bind(invoice.status)
        .bind(invoice.subtotal_cents)
        .bind(invoice.tax_rate_bps)
        .bind(invoice.tax_cents)
        .bind(invoice.total_cents)
        .bind(invoice.payment_method)
        .bind(invoice.issued_at)
        .bind(&invoice.notes)
        .execute(conn)
        .await?;

        Ok(())
    }

    /// Inserts one line item.
    ///
    /// ## Snapshot Pattern
    /// SKU, name and unit price are copied from the product at invoicing
    /// time, so later catalog edits never change an issued invoice.
    pub async fn insert_line_item(
        conn: &mut SqliteConnection,
        item: &InvoiceLineItem,
    ) -> DbResult<()> {
        debug!(
            invoice_id = %item.invoice_id,
            line_no = item.line_no,
            product_id = %item.product_id,
            "Inserting invoice line item"
        );

        sqlx::query(
            r#"
            INSERT INTO invoice_line_items (
                id, invoice_id, line_no, product_id,
                sku_snapshot, name_snapshot,
                quantity, unit_price_cents, line_total_cents
            ) VALUES (
                ?1, ?2, ?3, ?4,
                ?5, ?6,
                ?7, ?8, ?9
            )
            "#,
        )
        .bind(&item.id)
        .bind(&item.invoice_id)
        .bind(item.line_no)
        .bind(&item.product_id)
        .bind(&item.sku_snapshot)
        .bind(&item.name_snapshot)
        .bind(item.quantity)
        .bind(item.unit_price_cents)
        .bind(item.line_total_cents)
        .execute(conn)
        .await?;

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use tally_core::{InvoiceStatus, PaymentMethod, Product};

    async fn setup() -> (Database, Product) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product = db
            .products()
            .insert(&Product::new("WID-001", "Widget", 10_000, 50).unwrap())
            .await
            .unwrap();
        (db, product)
    }

    fn invoice(id: &str, number: &str, issued_at: DateTime<Utc>) -> Invoice {
        Invoice {
            id: id.to_string(),
            invoice_number: number.to_string(),
            customer_name: "Acme Ltd".to_string(),
            status: InvoiceStatus::Paid,
            subtotal_cents: 20_000,
            tax_rate_bps: 1800,
            tax_cents: 3_600,
            total_cents: 23_600,
            payment_method: Some(PaymentMethod::Upi),
            issued_at,
            notes: "net 30".to_string(),
            line_items: Vec::new(),
        }
    }

    fn item(invoice_id: &str, line_no: i64, product: &Product, quantity: i64) -> InvoiceLineItem {
        InvoiceLineItem {
            id: format!("{invoice_id}-{line_no}"),
            invoice_id: invoice_id.to_string(),
            line_no,
            product_id: product.id.clone(),
            sku_snapshot: product.sku.clone(),
            name_snapshot: product.name.clone(),
            quantity,
            unit_price_cents: product.price_cents,
            line_total_cents: product.price_cents * quantity,
        }
    }

    async fn store(db: &Database, invoice: &Invoice, items: &[InvoiceLineItem]) {
        let mut tx = db.pool().begin().await.unwrap();
        InvoiceRepository::insert_invoice(&mut tx, invoice).await.unwrap();
        for item in items {
            InvoiceRepository::insert_line_item(&mut tx, item).await.unwrap();
        }
        tx.commit().await.unwrap();
    }

    #[tokio::test]
    async fn test_get_returns_items_in_line_order() {
        let (db, product) = setup().await;
        let issued_at = Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, 0).unwrap();

        // Insert out of order; reads must sort by line_no.
        store(
            &db,
            &invoice("inv-1", "INV-202610-0001", issued_at),
            &[item("inv-1", 2, &product, 1), item("inv-1", 1, &product, 1)],
        )
        .await;

        let repo = db.invoices();
        let found = repo.get_by_id("inv-1").await.unwrap().unwrap();
        assert_eq!(found.invoice_number, "INV-202610-0001");
        assert_eq!(found.status, InvoiceStatus::Paid);
        assert_eq!(found.payment_method, Some(PaymentMethod::Upi));
        assert_eq!(found.issued_at, issued_at);
        assert_eq!(found.notes, "net 30");
        assert_eq!(
            found.line_items.iter().map(|li| li.line_no).collect::<Vec<_>>(),
            vec![1, 2]
        );

        let by_number = repo.get_by_number("INV-202610-0001").await.unwrap().unwrap();
        assert_eq!(by_number, found);

        assert!(repo.get_by_id("missing").await.unwrap().is_none());
        assert!(repo.get_by_number("INV-000000-0000").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_is_newest_first_with_item_counts() {
        let (db, product) = setup().await;
        let earlier = Utc.with_ymd_and_hms(2026, 10, 1, 9, 0, 0).unwrap();
        let later = earlier + Duration::days(3);

        store(
            &db,
            &invoice("inv-1", "INV-202610-0001", earlier),
            &[item("inv-1", 1, &product, 1)],
        )
        .await;
        store(
            &db,
            &invoice("inv-2", "INV-202610-0002", later),
            &[item("inv-2", 1, &product, 1), item("inv-2", 2, &product, 4)],
        )
        .await;

        let repo = db.invoices();
        let listed = repo.list(10).await.unwrap();

        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].invoice_number, "INV-202610-0002");
        assert_eq!(listed[0].item_count, 2);
        assert_eq!(listed[1].invoice_number, "INV-202610-0001");
        assert_eq!(listed[1].item_count, 1);

        assert_eq!(repo.list(1).await.unwrap().len(), 1);
        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_invoice_number_is_unique() {
        let (db, _) = setup().await;
        let now = Utc::now();
        store(&db, &invoice("inv-1", "INV-202610-0001", now), &[]).await;

        let mut conn = db.pool().acquire().await.unwrap();
        let err = InvoiceRepository::insert_invoice(&mut conn, &invoice("inv-2", "INV-202610-0001", now))
            .await
            .unwrap_err();

        assert!(err.is_unique_violation_on("invoices.invoice_number"), "got {err:?}");
        assert_eq!(InvoiceRepository::count_in(&mut conn).await.unwrap(), 1);
    }
}
