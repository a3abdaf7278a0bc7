//! # Error Types
//!
//! Domain-specific error types for dukkan-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  dukkan-core errors (this file)                                         │
//! │  ├── CoreError        - Ledger and bill rule violations                 │
//! │  └── ValidationError  - Input validation failures                       │
//! │                                                                         │
//! │  dukkan-db errors (separate crate)                                      │
//! │  └── DbError          - Database operation failures                     │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → caller                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (item name, quantities, etc.)
//! 3. Errors are enum variants, never String
//! 4. Every error is raised BEFORE any state mutates

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations or domain logic failures.
/// They should be caught and translated to user-friendly messages.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Item cannot be found.
    ///
    /// ## When This Occurs
    /// - Item ID doesn't exist in the catalog
    /// - Item was deleted between adding a bill line and committing it
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    /// Insufficient stock to complete the operation.
    ///
    /// ## When This Occurs
    /// - Adding a bill line for more than the available stock
    /// - Committing a bill after stock shrank since the line was added
    /// - Raising a sale line's quantity beyond what is left on the shelf
    ///
    /// ## User Workflow
    /// ```text
    /// Add to Bill (qty: 5)
    ///      │
    ///      ▼
    /// Check stock: available=3
    ///      │
    ///      ▼
    /// InsufficientStock { name: "Cola 330ml", available: 3, requested: 5 }
    ///      │
    ///      ▼
    /// UI shows: "Only 3 Cola 330ml in stock"
    /// ```
    #[error("Insufficient stock for {name}: available {available}, requested {requested}")]
    InsufficientStock {
        name: String,
        available: i64,
        requested: i64,
    },

    /// Bill has no catalog-backed lines, so there is nothing to persist.
    ///
    /// ## When This Occurs
    /// - Committing an empty bill
    /// - Committing a bill containing only custom (off-catalog) lines
    #[error("Bill has no catalog-backed lines to commit")]
    NothingToCommit,

    /// Bill line index does not exist.
    #[error("Bill line {index} does not exist (bill has {len} lines)")]
    LineIndexOutOfRange { index: usize, len: usize },

    /// Bill has exceeded the maximum allowed lines.
    #[error("Bill cannot have more than {max} lines")]
    BillTooLarge { max: usize },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., malformed barcode, invalid UUID).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
