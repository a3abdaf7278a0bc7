//! # Repository Module
//!
//! Database repository implementations for Dukkan POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.   │
//! │                                                                         │
//! │  Caller (UI / command layer)                                            │
//! │       │                                                                 │
//! │       │  db.sales().commit_bill(&bill)                                  │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  SaleRepository                                                         │
//! │  ├── commit_bill(&self, bill)       one transaction, all-or-nothing     │
//! │  ├── delete_sale(&self, id)         restores stock                      │
//! │  ├── delete_line(&self, id)         restores stock, recomputes totals   │
//! │  └── update_line(&self, id, ..)     delta stock check                   │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • Clean separation of concerns                                         │
//! │  • Easy to test (in-memory database per test)                           │
//! │  • SQL is isolated in one place                                         │
//! │  • Every multi-row mutation lives inside one transaction                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`item::ItemRepository`] - Catalog item CRUD, barcode lookup, search
//! - [`category::CategoryRepository`] - On-demand categories
//! - [`sale::SaleRepository`] - Ledger commit, reversals, sale queries
//! - [`report::ReportRepository`] - Read-only revenue/profit aggregation
//! - [`settings::SettingsRepository`] - Store profile row

pub mod category;
pub mod item;
pub mod report;
pub mod sale;
pub mod settings;
