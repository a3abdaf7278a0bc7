//! # dukkan-core: Pure Business Logic for Dukkan POS
//!
//! This crate is the **heart** of Dukkan POS. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Dukkan POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Presentation (out of scope here)                │   │
//! │  │    Catalog UI ──► Bill UI ──► Sales History ──► Dashboard       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ dukkan-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │  ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌──────────┐ ┌─────────┐ │   │
//! │  │  │  types  │ │  money  │ │  bill   │ │validation│ │ report  │ │   │
//! │  │  │  Item   │ │  Money  │ │  Bill   │ │ barcode  │ │ margins │ │   │
//! │  │  │  Sale   │ │  cents  │ │ BillLine│ │  rules   │ │  KPIs   │ │   │
//! │  │  └─────────┘ └─────────┘ └─────────┘ └──────────┘ └─────────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    dukkan-db (Database Layer)                   │   │
//! │  │        SQLite queries, migrations, ledger transactions          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Category, Item, Sale, SaleLine, StoreProfile)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`bill`] - The in-memory bill session a cashier builds before checkout
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation (barcodes, names, quantities)
//! - [`report`] - Revenue/profit/margin shapes for the dashboard
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//! 5. **Frozen History**: Sale lines snapshot prices at commit; reports never
//!    chase live catalog edits
//!
//! ## Example Usage
//!
//! ```rust
//! use dukkan_core::money::Money;
//!
//! // Create money from cents (never from floats!)
//! let price = Money::from_cents(500); // 5.00
//!
//! // Line totals are plain integer math
//! let line_total = price.multiply_quantity(4);
//! assert_eq!(line_total.cents(), 2000);
//!
//! // Display uses the store's configured currency symbol
//! assert_eq!(line_total.format_with("DA"), "20.00 DA");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod bill;
pub mod error;
pub mod money;
pub mod report;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use dukkan_core::Money` instead of
// `use dukkan_core::money::Money`

pub use bill::{Bill, BillLine};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use report::{RevenueSummary, SalesKpis};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum lines allowed on a single bill
///
/// ## Business Reason
/// Prevents runaway bills and ensures reasonable transaction sizes.
pub const MAX_BILL_LINES: usize = 100;

/// Maximum quantity on a single bill or sale line
///
/// ## Business Reason
/// Prevents accidental over-entry (e.g., typing 1000 instead of 10).
pub const MAX_LINE_QUANTITY: i64 = 999;
