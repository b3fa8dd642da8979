//! # Product Repository
//!
//! Catalog reads, seeding inserts, and the conditional stock decrement the
//! invoice engine runs inside its transaction.
//!
//! ## Conditional Decrement
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Stock Update Strategy                                │
//! │                                                                         │
//! │  ❌ WRONG: read, check in Rust, write back                             │
//! │     SELECT stock_quantity ...           → 5                            │
//! │     (another writer takes 3 here)                                      │
//! │     UPDATE products SET stock_quantity = 5 - 4    → oversold           │
//! │                                                                         │
//! │  ✅ CORRECT: check and write in one statement                          │
//! │     UPDATE products                                                     │
//! │        SET stock_quantity = stock_quantity - 4                         │
//! │      WHERE id = ? AND stock_quantity >= 4                              │
//! │                                                                         │
//! │  rows_affected = 1 → reserved                                          │
//! │  rows_affected = 0 → not enough stock (or no such product)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use tally_core::Product;

const PRODUCT_COLUMNS: &str =
    "id, sku, name, description, price_cents, stock_quantity, created_at, updated_at";

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
///
/// let product = repo.get_by_sku("WID-001").await?;
/// let catalog = repo.get_many(&ids).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Gets a product by its SKU.
    pub async fn get_by_sku(&self, sku: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE sku = ?1"
        ))
        .bind(sku.trim())
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Fetches several products in one query, keyed by id.
    ///
    /// Unknown ids are simply absent from the map.
    pub async fn get_many(&self, ids: &[String]) -> DbResult<HashMap<String, Product>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        debug!(count = ids.len(), "Fetching products");

        let mut query: QueryBuilder<'_, Sqlite> =
            QueryBuilder::new(format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id IN ("));
        let mut separated = query.separated(", ");
        for id in ids {
            separated.push_bind(id.as_str());
        }
        separated.push_unseparated(")");

        let products = query
            .build_query_as::<Product>()
            .fetch_all(&self.pool)
            .await?;

        Ok(products.into_iter().map(|p| (p.id.clone(), p)).collect())
    }

    /// Lists products ordered by name.
    pub async fn list(&self, limit: u32) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY name, sku LIMIT ?1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Inserts a new product.
    ///
    /// ## Returns
    /// * `Ok(Product)` - The inserted product
    /// * `Err(DbError::UniqueViolation)` - SKU already exists
    pub async fn insert(&self, product: &Product) -> DbResult<Product> {
        debug!(sku = %product.sku, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, sku, name, description,
                price_cents, stock_quantity,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&product.id)
        .bind(&product.sku)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price_cents)
        .bind(product.stock_quantity)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(product.clone())
    }

    /// Counts catalog products.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    // =========================================================================
    // Transaction-scoped operations
    // =========================================================================

    /// Reads a product on an open connection or transaction.
    pub async fn get_by_id_in(conn: &mut SqliteConnection, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(product)
    }

    /// Takes `quantity` units from stock if at least that many remain.
    ///
    /// Returns `false` when nothing was changed: the product is missing or
    /// has fewer than `quantity` units.
    pub async fn decrement_stock(
        conn: &mut SqliteConnection,
        id: &str,
        quantity: i64,
        now: DateTime<Utc>,
    ) -> DbResult<bool> {
        debug!(product_id = %id, quantity, "Decrementing stock");

        let result = sqlx::query(
            r#"
            UPDATE products
            SET
                stock_quantity = stock_quantity - ?2,
                updated_at = ?3
            WHERE id = ?1 AND stock_quantity >= ?2
            "#,
        )
        .bind(id)
        .bind(quantity)
        .bind(now)
        .execute(conn)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};

    async fn setup() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = setup().await;
        let repo = db.products();

        let product = Product::new("WID-001", "Widget", 10_000, 5).unwrap();
        repo.insert(&product).await.unwrap();

        let by_id = repo.get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(by_id.sku, "WID-001");
        assert_eq!(by_id.price_cents, 10_000);
        assert_eq!(by_id.stock_quantity, 5);

        let by_sku = repo.get_by_sku("WID-001").await.unwrap().unwrap();
        assert_eq!(by_sku.id, product.id);

        assert!(repo.get_by_id("missing").await.unwrap().is_none());
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_sku_is_rejected() {
        let db = setup().await;
        let repo = db.products();

        repo.insert(&Product::new("WID-001", "Widget", 100, 1).unwrap())
            .await
            .unwrap();
        let err = repo
            .insert(&Product::new("WID-001", "Other", 200, 1).unwrap())
            .await
            .unwrap_err();

        assert!(err.is_unique_violation_on("products.sku"), "got {err:?}");
    }

    #[tokio::test]
    async fn test_get_many_skips_unknown_ids() {
        let db = setup().await;
        let repo = db.products();

        let a = repo.insert(&Product::new("A-1", "Alpha", 100, 1).unwrap()).await.unwrap();
        let b = repo.insert(&Product::new("B-1", "Beta", 200, 2).unwrap()).await.unwrap();

        let found = repo
            .get_many(&[a.id.clone(), "nope".to_string(), b.id.clone()])
            .await
            .unwrap();

        assert_eq!(found.len(), 2);
        assert_eq!(found[&a.id].name, "Alpha");
        assert_eq!(found[&b.id].name, "Beta");

        assert!(repo.get_many(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_orders_by_name() {
        let db = setup().await;
        let repo = db.products();

        repo.insert(&Product::new("Z-1", "Zeta", 100, 1).unwrap()).await.unwrap();
        repo.insert(&Product::new("A-1", "Alpha", 100, 1).unwrap()).await.unwrap();

        let names: Vec<_> = repo.list(10).await.unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Alpha", "Zeta"]);

        assert_eq!(repo.list(1).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_decrement_stock_is_conditional() {
        let db = setup().await;
        let product = db
            .products()
            .insert(&Product::new("WID-001", "Widget", 100, 3).unwrap())
            .await
            .unwrap();

        let mut conn = db.pool().acquire().await.unwrap();

        assert!(!ProductRepository::decrement_stock(&mut conn, &product.id, 4, Utc::now())
            .await
            .unwrap());
        assert!(ProductRepository::decrement_stock(&mut conn, &product.id, 3, Utc::now())
            .await
            .unwrap());
        assert!(!ProductRepository::decrement_stock(&mut conn, "missing", 1, Utc::now())
            .await
            .unwrap());

        let after = ProductRepository::get_by_id_in(&mut conn, &product.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(after.stock_quantity, 0);
    }

    #[tokio::test]
    async fn test_schema_rejects_negative_stock() {
        let db = setup().await;
        let product = db
            .products()
            .insert(&Product::new("WID-001", "Widget", 100, 1).unwrap())
            .await
            .unwrap();

        let err: DbError = sqlx::query("UPDATE products SET stock_quantity = -1 WHERE id = ?1")
            .bind(&product.id)
            .execute(db.pool())
            .await
            .unwrap_err()
            .into();

        assert!(matches!(err, DbError::CheckViolation { .. }), "got {err:?}");
    }
}
