//! # Bill Session
//!
//! The in-memory working bill a cashier builds before committing it to the
//! ledger. Nothing here touches storage; the commit happens in dukkan-db.
//!
//! ## Bill Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Bill Session Operations                            │
//! │                                                                         │
//! │  Cashier Action            Bill Operation          State Change         │
//! │  ──────────────            ──────────────          ────────────         │
//! │                                                                         │
//! │  Scan / pick item ───────► add_item() ───────────► lines.push(line)     │
//! │                                                                         │
//! │  Off-catalog service ────► add_custom_line() ────► lines.push(line)     │
//! │                                                                         │
//! │  Remove a row ───────────► remove_line(index) ───► lines.remove(i)      │
//! │                                                                         │
//! │  Checkout ───────────────► SaleRepository::commit_bill(&bill)           │
//! │                                │                                        │
//! │                                └── on success the CALLER clears the     │
//! │                                    bill; on failure it stays intact     │
//! │                                    for correction                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Stock Checking
//! Adding a catalog line performs an optimistic, session-local check against
//! the stock the caller just loaded, counting quantity already pending in
//! this bill for the same item. It reserves nothing. The ledger commit
//! re-validates every line against current stock inside its transaction, so
//! a stale session can never oversell.
//!
//! ## Thread Safety
//! A `Bill` is a plain owned value. Callers that share one across threads
//! wrap it in `Arc<Mutex<Bill>>` themselves.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::Item;
use crate::validation::{validate_item_name, validate_price_cents, validate_quantity};
use crate::MAX_BILL_LINES;

// =============================================================================
// Bill Line
// =============================================================================

/// One row of the working bill.
///
/// ## Why an enum?
/// Custom (off-catalog) lines structurally cannot carry an item reference,
/// so stock checks and persistence skip them by type, not by convention.
/// No sentinel ids, no `is_custom` flag to forget to check.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BillLine {
    /// A line backed by a catalog item.
    Catalog {
        /// Catalog item ID (UUID).
        item_id: String,
        /// Item name at time of adding (display only).
        name: String,
        /// Item barcode at time of adding (display only).
        barcode: Option<String>,
        /// Price per unit the cashier sees on this bill. Usually the item's
        /// catalog price; a manual override changes the display, never the
        /// committed snapshot.
        unit_price_cents: i64,
        /// Purchase cost per unit at time of adding (profit preview).
        unit_cost_cents: i64,
        /// Units on this line. Always positive.
        quantity: i64,
    },
    /// An off-catalog line: a service, a one-off good. Displayed and summed,
    /// never persisted, never stock-checked.
    Custom {
        name: String,
        barcode: Option<String>,
        unit_price_cents: i64,
        quantity: i64,
    },
}

impl BillLine {
    /// Builds a catalog line from an item, freezing its fields for display.
    pub fn from_item(item: &Item, quantity: i64, unit_price: Money) -> Self {
        BillLine::Catalog {
            item_id: item.id.clone(),
            name: item.name.clone(),
            barcode: item.barcode.clone(),
            unit_price_cents: unit_price.cents(),
            unit_cost_cents: item.cost_cents,
            quantity,
        }
    }

    /// Builds a custom line with a cashier-entered name and price.
    pub fn custom(
        name: impl Into<String>,
        barcode: Option<String>,
        quantity: i64,
        unit_price: Money,
    ) -> Self {
        BillLine::Custom {
            name: name.into(),
            barcode,
            unit_price_cents: unit_price.cents(),
            quantity,
        }
    }

    /// Display name of the line.
    pub fn name(&self) -> &str {
        match self {
            BillLine::Catalog { name, .. } | BillLine::Custom { name, .. } => name,
        }
    }

    /// Barcode shown on the line, if any.
    pub fn barcode(&self) -> Option<&str> {
        match self {
            BillLine::Catalog { barcode, .. } | BillLine::Custom { barcode, .. } => {
                barcode.as_deref()
            }
        }
    }

    /// Units on this line.
    pub fn quantity(&self) -> i64 {
        match self {
            BillLine::Catalog { quantity, .. } | BillLine::Custom { quantity, .. } => *quantity,
        }
    }

    /// Price per unit as Money.
    pub fn unit_price(&self) -> Money {
        match self {
            BillLine::Catalog {
                unit_price_cents, ..
            }
            | BillLine::Custom {
                unit_price_cents, ..
            } => Money::from_cents(*unit_price_cents),
        }
    }

    /// Line subtotal (unit price × quantity) in cents.
    pub fn subtotal_cents(&self) -> i64 {
        self.unit_price().cents() * self.quantity()
    }

    /// Line subtotal as Money.
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents())
    }

    /// The backing item's ID for catalog lines, `None` for custom lines.
    pub fn item_id(&self) -> Option<&str> {
        match self {
            BillLine::Catalog { item_id, .. } => Some(item_id),
            BillLine::Custom { .. } => None,
        }
    }

    /// True for off-catalog lines.
    pub fn is_custom(&self) -> bool {
        matches!(self, BillLine::Custom { .. })
    }
}

// =============================================================================
// Bill
// =============================================================================

/// The working bill.
///
/// ## Invariants
/// - Every line has quantity > 0 and unit price >= 0
/// - At most [`MAX_BILL_LINES`] lines
/// - The same item may appear on several lines; the session stock check
///   counts them together
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bill {
    /// Lines in scan order.
    pub lines: Vec<BillLine>,

    /// When the bill was started / last cleared.
    pub created_at: DateTime<Utc>,
}

impl Bill {
    /// Creates a new empty bill.
    pub fn new() -> Self {
        Bill {
            lines: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Adds a catalog item at its current catalog price.
    ///
    /// The common path: scan a barcode, look the item up, call this.
    pub fn add_item(&mut self, item: &Item, quantity: i64) -> CoreResult<()> {
        self.add_catalog_line(item, quantity, item.price())
    }

    /// Adds a catalog item at an explicit unit price (manual price entry).
    ///
    /// ## Checks, in order, before anything changes
    /// 1. quantity is positive and within the per-line cap
    /// 2. unit price is not negative
    /// 3. the bill has room for another line
    /// 4. requested + quantity already pending here for this item fits the
    ///    stock the caller loaded
    pub fn add_catalog_line(
        &mut self,
        item: &Item,
        quantity: i64,
        unit_price: Money,
    ) -> CoreResult<()> {
        validate_quantity(quantity)?;
        validate_price_cents(unit_price.cents())?;
        self.check_capacity()?;

        let pending = self.pending_quantity(&item.id);
        if pending + quantity > item.stock_count {
            return Err(CoreError::InsufficientStock {
                name: item.name.clone(),
                available: item.stock_count - pending,
                requested: quantity,
            });
        }

        self.lines.push(BillLine::from_item(item, quantity, unit_price));
        Ok(())
    }

    /// Adds an off-catalog line.
    ///
    /// Requires a non-empty name, positive quantity, non-negative price.
    /// The barcode field is free-form display text; custom lines never
    /// reach the catalog, so no format rule applies.
    pub fn add_custom_line(
        &mut self,
        name: &str,
        barcode: Option<String>,
        quantity: i64,
        unit_price: Money,
    ) -> CoreResult<()> {
        validate_item_name(name)?;
        validate_quantity(quantity)?;
        validate_price_cents(unit_price.cents())?;
        self.check_capacity()?;

        self.lines
            .push(BillLine::custom(name.trim(), barcode, quantity, unit_price));
        Ok(())
    }

    /// Removes and returns the line at `index`.
    pub fn remove_line(&mut self, index: usize) -> CoreResult<BillLine> {
        if index >= self.lines.len() {
            return Err(CoreError::LineIndexOutOfRange {
                index,
                len: self.lines.len(),
            });
        }
        Ok(self.lines.remove(index))
    }

    /// Clears all lines and restarts the session clock.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.created_at = Utc::now();
    }

    /// The displayed bill total in cents. Custom lines count here even
    /// though they are never persisted.
    pub fn total_cents(&self) -> i64 {
        self.lines.iter().map(|l| l.subtotal_cents()).sum()
    }

    /// The displayed bill total as Money.
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents())
    }

    /// Number of lines on the bill.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Total quantity across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity()).sum()
    }

    /// Checks if the bill has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// True if at least one line is catalog-backed (i.e. a commit would
    /// have something to persist).
    pub fn has_catalog_lines(&self) -> bool {
        self.lines.iter().any(|l| !l.is_custom())
    }

    /// Quantity already pending on this bill for the given item.
    pub fn pending_quantity(&self, item_id: &str) -> i64 {
        self.lines
            .iter()
            .filter(|l| l.item_id() == Some(item_id))
            .map(|l| l.quantity())
            .sum()
    }

    fn check_capacity(&self) -> CoreResult<()> {
        if self.lines.len() >= MAX_BILL_LINES {
            return Err(CoreError::BillTooLarge {
                max: MAX_BILL_LINES,
            });
        }
        Ok(())
    }
}

impl Default for Bill {
    fn default() -> Self {
        Bill::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
