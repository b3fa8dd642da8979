//! # Repository Module
//!
//! Database repository implementations for Tally.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  Caller                                                                │
//! │       │  db.invoices().get_by_number("INV-202610-0001")                │
//! │       ▼                                                                 │
//! │  InvoiceRepository / ProductRepository                                 │
//! │  ├── &self methods      → run on the pool (reads, seeding)             │
//! │  └── associated fns     → take &mut SqliteConnection so the            │
//! │                           engine can run them inside one transaction  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`](product::ProductRepository) - Catalog reads and stock decrement
//! - [`InvoiceRepository`](invoice::InvoiceRepository) - Invoice reads and inserts

pub mod invoice;
pub mod product;
