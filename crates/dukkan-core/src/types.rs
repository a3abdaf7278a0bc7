//! # Domain Types
//!
//! Core domain types used throughout Dukkan POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Category     │   │      Item       │   │      Sale       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  name (unique)  │   │  barcode        │   │  total_cents    │       │
//! │  └─────────────────┘   │  price_cents    │   │  total_cost     │       │
//! │                        │  cost_cents     │   │  created_at     │       │
//! │                        │  stock_count    │   └────────┬────────┘       │
//! │                        └─────────────────┘            │                │
//! │                                                       ▼                │
//! │                                              ┌─────────────────┐       │
//! │                                              │    SaleLine     │       │
//! │                                              │  ─────────────  │       │
//! │                                              │  unit_price ◄── snapshot│
//! │                                              │  unit_cost  ◄── snapshot│
//! │                                              │  quantity       │       │
//! │                                              └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! A `SaleLine` freezes the item's price and cost at commit time. Later
//! catalog edits never rewrite history; recorded revenue and profit stay
//! exactly what they were at the moment of sale.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Category
// =============================================================================

/// A catalog category, created on demand when referenced by name.
///
/// Items hold a weak back-reference: deleting a category leaves its items
/// uncategorized rather than deleting them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Category {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name, unique across the catalog.
    pub name: String,

    /// When the category was created.
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Item
// =============================================================================

/// A catalog item available for sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Item {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown to the cashier and on receipts.
    pub name: String,

    /// Owning category, if any. `None` means uncategorized.
    pub category_id: Option<String>,

    /// Barcode (EAN-8, UPC-A, or EAN-13). All digits when present.
    pub barcode: Option<String>,

    /// Selling price in cents (smallest currency unit).
    pub price_cents: i64,

    /// Purchase (wholesale) cost in cents, for profit calculations.
    pub cost_cents: i64,

    /// Units currently on the shelf. Never negative.
    pub stock_count: i64,

    /// Path to a product photo, if one was captured.
    pub photo_path: Option<String>,

    /// When the item was added to the catalog.
    pub created_at: DateTime<Utc>,

    /// When the item was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Item {
    /// Returns the selling price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Returns the purchase cost as Money.
    #[inline]
    pub fn cost(&self) -> Money {
        Money::from_cents(self.cost_cents)
    }

    /// Checks whether the shelf holds at least `quantity` units.
    #[inline]
    pub fn in_stock(&self, quantity: i64) -> bool {
        self.stock_count >= quantity
    }

    /// Margin earned per unit sold at the current price.
    #[inline]
    pub fn unit_margin(&self) -> Money {
        self.price() - self.cost()
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A committed sale transaction.
///
/// Sales are born only from a bill commit. `created_at` is the immutable
/// moment of sale; `updated_at` moves when reversal operations edit lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Sale {
    pub id: String,
    /// Sum of line totals, maintained by commit and reversal operations.
    pub total_cents: i64,
    /// Sum of quantity × unit cost over the lines, for profit reporting.
    pub total_cost_cents: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Sale {
    /// Returns the sale total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Returns the total purchase cost as Money.
    #[inline]
    pub fn total_cost(&self) -> Money {
        Money::from_cents(self.total_cost_cents)
    }

    /// Profit recorded for this sale, in cents.
    #[inline]
    pub fn profit_cents(&self) -> i64 {
        self.total_cents - self.total_cost_cents
    }

    /// Profit recorded for this sale as Money.
    #[inline]
    pub fn profit(&self) -> Money {
        self.total() - self.total_cost()
    }
}

// =============================================================================
// Sale Line
// =============================================================================

/// A persisted line of a sale.
/// Uses the snapshot pattern to freeze item pricing at commit time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleLine {
    pub id: String,
    pub sale_id: String,
    /// The catalog item this line sold. Always a real item; custom bill
    /// lines are never persisted.
    pub item_id: String,
    /// Units sold. Always positive.
    pub quantity: i64,
    /// Selling price per unit at time of sale (frozen).
    pub unit_price_cents: i64,
    /// Purchase cost per unit at time of sale (frozen).
    pub unit_cost_cents: i64,
    /// unit_price × quantity, stored and kept consistent by edits.
    pub line_total_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl SaleLine {
    /// Returns the frozen unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the frozen unit cost as Money.
    #[inline]
    pub fn unit_cost(&self) -> Money {
        Money::from_cents(self.unit_cost_cents)
    }

    /// Returns the line total as Money.
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.line_total_cents)
    }

    /// Profit earned by this line: (unit price − unit cost) × quantity.
    #[inline]
    pub fn profit_cents(&self) -> i64 {
        (self.unit_price_cents - self.unit_cost_cents) * self.quantity
    }
}

// =============================================================================
// Sale Line Detail
// =============================================================================

/// A sale line joined with its item's current name, for detail views.
///
/// The name is display context only; everything monetary still comes from
/// the frozen snapshots on the line itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleLineDetail {
    pub id: String,
    pub sale_id: String,
    pub item_id: String,
    /// Current catalog name of the item.
    pub item_name: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub unit_cost_cents: i64,
    pub line_total_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl SaleLineDetail {
    /// Profit earned by this line: (unit price − unit cost) × quantity.
    #[inline]
    pub fn profit_cents(&self) -> i64 {
        (self.unit_price_cents - self.unit_cost_cents) * self.quantity
    }
}

// =============================================================================
// Store Profile
// =============================================================================

/// Deployment-wide shop identity, persisted as a single row.
///
/// The currency is a display label only; all arithmetic stays in integer
/// cents regardless of what the shop trades in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct StoreProfile {
    /// Shop name printed on receipts and shown in the title bar.
    pub shop_name: String,

    /// Phone or other contact line.
    pub contact: Option<String>,

    /// Street address or neighbourhood.
    pub location: Option<String>,

    /// Currency symbol appended to displayed amounts.
    pub currency: String,
}

impl Default for StoreProfile {
    fn default() -> Self {
        StoreProfile {
            shop_name: "My Store".to_string(),
            contact: None,
            location: None,
            currency: "$".to_string(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn test_item() -> Item {
        Item {
            id: "item-1".to_string(),
            name: "Cola 330ml".to_string(),
            category_id: None,
            barcode: Some("5901234123457".to_string()),
            price_cents: 500,
            cost_cents: 300,
            stock_count: 10,
            photo_path: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_item_money_accessors() {
        let item = test_item();
        assert_eq!(item.price(), Money::from_cents(500));
        assert_eq!(item.cost(), Money::from_cents(300));
        assert_eq!(item.unit_margin(), Money::from_cents(200));
    }

    #[test]
    fn test_item_in_stock() {
        let item = test_item();
        assert!(item.in_stock(10));
        assert!(item.in_stock(1));
        assert!(!item.in_stock(11));
    }

    #[test]
    fn test_sale_profit() {
        let sale = Sale {
            id: "sale-1".to_string(),
            total_cents: 2000,
            total_cost_cents: 1200,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(sale.profit_cents(), 800);
        assert_eq!(sale.profit(), Money::from_cents(800));
    }

    #[test]
    fn test_sale_line_profit() {
        let line = SaleLine {
            id: "line-1".to_string(),
            sale_id: "sale-1".to_string(),
            item_id: "item-1".to_string(),
            quantity: 4,
            unit_price_cents: 500,
            unit_cost_cents: 300,
            line_total_cents: 2000,
            created_at: Utc::now(),
        };
        // (500 - 300) × 4
        assert_eq!(line.profit_cents(), 800);
        assert_eq!(line.line_total(), Money::from_cents(2000));
    }

    #[test]
    fn test_store_profile_default() {
        let profile = StoreProfile::default();
        assert_eq!(profile.shop_name, "My Store");
        assert_eq!(profile.currency, "$");
        assert!(profile.contact.is_none());
    }
}
