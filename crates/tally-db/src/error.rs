//! # Database Error Types
//!
//! Error types for database operations and invoice creation.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)          Rule violation (CoreError)        │
//! │       │                                     │                           │
//! │       ▼                                     │                           │
//! │  DbError ← Adds categorization              │                           │
//! │       │                                     │                           │
//! │       └───────────────┬─────────────────────┘                           │
//! │                       ▼                                                 │
//! │  InvoiceError ← The six kinds callers branch on                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Caller (CLI prints message, exits non-zero)                           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tally_core::{CoreError, ValidationError};
use thiserror::Error;

/// Database operation errors.
///
/// These errors wrap sqlx errors and provide additional context
/// for debugging and user feedback.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in database.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation.
    ///
    /// ## When This Occurs
    /// - Inserting a duplicate SKU
    /// - Two writers deriving the same invoice number
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// Foreign key constraint violation.
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// CHECK constraint violation (e.g. stock would go negative).
    #[error("Check constraint violation: {message}")]
    CheckViolation { message: String },

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file can't be created
    /// - File permissions issue
    /// - Disk full
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Transaction failed to begin, commit or roll back.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Whether this is a UNIQUE violation on `table.column`.
    pub fn is_unique_violation_on(&self, column: &str) -> bool {
        matches!(self, DbError::UniqueViolation { field, .. } if field == column)
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → Analyze message for constraint type
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // SQLite constraint messages:
                // "UNIQUE constraint failed: <table>.<column>"
                // "FOREIGN KEY constraint failed"
                // "CHECK constraint failed: <expr>"
                if msg.contains("UNIQUE constraint failed") {
                    let field = msg
                        .split("UNIQUE constraint failed: ")
                        .nth(1)
                        .unwrap_or("unknown")
                        .to_string();
                    DbError::UniqueViolation {
                        field,
                        value: "unknown".to_string(),
                    }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else if msg.contains("CHECK constraint failed") {
                    DbError::CheckViolation {
                        message: msg.to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// Invoice Error
// =============================================================================

/// Why an invoice could not be created.
///
/// Every variant means nothing was written: no invoice row, no line items,
/// no stock change.
///
/// ## Retrying
/// ```text
/// EmptyInvoice / InvalidRequest / ProductNotFound  → fix the request
/// InsufficientStock                                → fix quantities or restock
/// InvoiceNumberConflict                            → safe to retry as-is
/// TransactionFailure                               → store trouble, retry later
/// ```
#[derive(Debug, Error)]
pub enum InvoiceError {
    #[error("Invoice must have at least one line item")]
    EmptyInvoice,

    #[error("Invalid request: {0}")]
    InvalidRequest(ValidationError),

    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("Insufficient stock for {product_name}. Available: {available}, Requested: {requested}")]
    InsufficientStock {
        product_id: String,
        product_name: String,
        available: i64,
        requested: i64,
    },

    /// Another writer committed the same invoice number first.
    #[error("Invoice number {invoice_number} is already taken")]
    InvoiceNumberConflict { invoice_number: String },

    #[error("Transaction failed: {0}")]
    TransactionFailure(#[from] DbError),
}

impl InvoiceError {
    /// Whether retrying the identical request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            InvoiceError::InvoiceNumberConflict { .. } | InvoiceError::TransactionFailure(_)
        )
    }
}

impl From<CoreError> for InvoiceError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::EmptyInvoice => InvoiceError::EmptyInvoice,
            CoreError::ProductNotFound(id) => InvoiceError::ProductNotFound(id),
            CoreError::InsufficientStock {
                product_id,
                product_name,
                available,
                requested,
            } => InvoiceError::InsufficientStock {
                product_id,
                product_name,
                available,
                requested,
            },
            CoreError::Validation(err) => InvoiceError::InvalidRequest(err),
        }
    }
}

impl From<ValidationError> for InvoiceError {
    fn from(err: ValidationError) -> Self {
        InvoiceError::InvalidRequest(err)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
