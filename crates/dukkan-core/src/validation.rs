//! # Validation Module
//!
//! Input validation utilities for Dukkan POS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Caller (UI / command layer)                                   │
//! │  ├── Basic format checks (empty, length)                                │
//! │  └── Immediate user feedback                                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE, called by every repository write                 │
//! │  └── Business rule validation, before anything mutates                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                             │
//! │  ├── NOT NULL constraints                                               │
//! │  ├── UNIQUE constraints (barcode, category name)                        │
//! │  └── CHECK constraints (stock_count >= 0)                               │
//! │                                                                         │
//! │  Defense in depth: Multiple layers catch different errors               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use dukkan_core::validation::{validate_barcode, validate_quantity};
//!
//! // Validate a scanned barcode before catalog insert
//! assert!(validate_barcode("5901234123457").is_ok());
//!
//! // Validate quantity before a bill operation
//! assert!(validate_quantity(5).is_ok());
//! ```

use crate::error::ValidationError;
use crate::types::Item;
use crate::MAX_LINE_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Barcode lengths the catalog accepts: EAN-8, UPC-A, EAN-13.
pub const ALLOWED_BARCODE_LENGTHS: [usize; 3] = [8, 12, 13];

// =============================================================================
// String Validators
// =============================================================================

/// Validates an item name.
///
/// ## Rules
/// - Must not be empty
/// - Must be between 1 and 200 characters
///
/// ## Example
/// ```rust
/// use dukkan_core::validation::validate_item_name;
///
/// assert!(validate_item_name("Cola 330ml").is_ok());
/// assert!(validate_item_name("").is_err());
/// ```
pub fn validate_item_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a category name.
///
/// ## Rules
/// - Must not be empty
/// - Must be between 1 and 100 characters
pub fn validate_category_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "category name".to_string(),
        });
    }

    if name.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "category name".to_string(),
            max: 100,
        });
    }

    Ok(())
}

/// Validates a barcode.
///
/// ## Rules
/// - Must contain only digits
/// - Length must be 8 (EAN-8), 12 (UPC-A), or 13 (EAN-13)
///
/// No checksum verification: scanners already reject bad check digits,
/// and hand-typed store codes often carry none.
///
/// ## Example
/// ```rust
/// use dukkan_core::validation::validate_barcode;
///
/// assert!(validate_barcode("96385074").is_ok());      // EAN-8
/// assert!(validate_barcode("036000291452").is_ok());  // UPC-A
/// assert!(validate_barcode("5901234123457").is_ok()); // EAN-13
/// assert!(validate_barcode("12345").is_err());        // bad length
/// assert!(validate_barcode("59012341ABCDE").is_err());// not digits
/// ```
pub fn validate_barcode(code: &str) -> ValidationResult<()> {
    let code = code.trim();

    if !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "barcode".to_string(),
            reason: "must contain only digits".to_string(),
        });
    }

    if !ALLOWED_BARCODE_LENGTHS.contains(&code.len()) {
        return Err(ValidationError::InvalidFormat {
            field: "barcode".to_string(),
            reason: "length must be 8, 12, or 13 digits".to_string(),
        });
    }

    Ok(())
}

/// Validates a search query.
///
/// ## Rules
/// - Can be empty (returns all/default results)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_LINE_QUANTITY (999)
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Bill: Add Line                                                         │
/// │                                                                         │
/// │  User enters quantity: 5                                                │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_quantity(5) ← THIS FUNCTION                                   │
/// │       │                                                                 │
/// │       ├── qty <= 0? → Error: "quantity must be positive"                │
/// │       │                                                                 │
/// │       ├── qty > 999? → Error: "quantity must be between 1 and 999"      │
/// │       │                                                                 │
/// │       └── OK → Proceed with stock check                                 │
/// │                                                                         │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a selling price in cents.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (giveaway items)
///
/// ## Example
/// ```rust
/// use dukkan_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(1099).is_ok());
/// assert!(validate_price_cents(0).is_ok());
/// assert!(validate_price_cents(-100).is_err());
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a purchase cost in cents.
///
/// ## Rules
/// - Must be non-negative (>= 0)
pub fn validate_cost_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "cost".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a stock count.
///
/// ## Rules
/// - Must be non-negative (>= 0); zero means sold out, never oversold
pub fn validate_stock_count(count: i64) -> ValidationResult<()> {
    if count < 0 {
        return Err(ValidationError::OutOfRange {
            field: "stock_count".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Composite Validators
// =============================================================================

/// Validates a full item before insert or update.
///
/// Runs every field rule; the first violation is returned. Called by the
/// catalog repository before any row is touched.
pub fn validate_item(item: &Item) -> ValidationResult<()> {
    validate_item_name(&item.name)?;

    if let Some(barcode) = &item.barcode {
        validate_barcode(barcode)?;
    }

    validate_price_cents(item.price_cents)?;
    validate_cost_cents(item.cost_cents)?;
    validate_stock_count(item.stock_count)?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
