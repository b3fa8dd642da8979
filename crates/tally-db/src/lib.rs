//! # tally-db: Database Layer for Tally
//!
//! SQLite storage for the catalog and invoices, plus the transactional
//! [`InvoiceEngine`] that turns a [`CreateInvoiceRequest`](tally_core::CreateInvoiceRequest)
//! into a committed invoice.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Tally Data Flow                                │
//! │                                                                         │
//! │  tally create-invoice --item P1:3 --paid --method card                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     tally-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ ProductRepo   │    │ 001_initial  │  │   │
//! │  │   │ SqlitePool    │◄───│ InvoiceRepo   │    │  _schema.sql │  │   │
//! │  │   └───────┬───────┘    └───────▲───────┘    └──────────────┘  │   │
//! │  │           │                    │                               │   │
//! │  │           └──► InvoiceEngine ──┘  (one transaction per invoice) │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database file (WAL)                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database and invoice error types
//! - [`repository`] - Product and invoice repositories
//! - [`engine`] - Atomic invoice creation
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tally_core::{CreateInvoiceRequest, LineItemRequest};
//! use tally_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./tally.db")).await?;
//!
//! let request = CreateInvoiceRequest::new(vec![LineItemRequest::new(product_id, 3)]);
//! let invoice = db.invoice_engine().create_invoice(request).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod engine;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use engine::InvoiceEngine;
pub use error::{DbError, DbResult, InvoiceError};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::invoice::InvoiceRepository;
pub use repository::product::ProductRepository;
