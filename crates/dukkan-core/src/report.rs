//! # Reporting Types
//!
//! Pure aggregation types for the sales dashboard. All sums are computed by
//! dukkan-db from persisted sale lines; this module only holds the shapes
//! and the margin arithmetic.
//!
//! ## What the Dashboard Shows
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  All-time revenue   All-time profit   Today revenue   Today profit      │
//! │  ────────────────   ───────────────   ─────────────   ────────────      │
//! │        Σ line totals and Σ (price − cost) × qty over sale lines         │
//! │                                                                         │
//! │  Latest sale: total + timestamp of the most recent commit               │
//! │  Per-sale view: revenue / profit / margin% for one selected sale        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything is derived from the frozen snapshots on sale lines, so catalog
//! price edits never rewrite past figures.

use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::Sale;

// =============================================================================
// Revenue Summary
// =============================================================================

/// Revenue and profit over some set of sale lines (all time, one day, one
/// sale). Profit is revenue minus the frozen purchase costs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct RevenueSummary {
    /// Σ line_total_cents.
    pub revenue_cents: i64,
    /// Σ (unit_price_cents − unit_cost_cents) × quantity.
    pub profit_cents: i64,
}

impl RevenueSummary {
    /// Returns the revenue as Money.
    #[inline]
    pub fn revenue(&self) -> Money {
        Money::from_cents(self.revenue_cents)
    }

    /// Returns the profit as Money.
    #[inline]
    pub fn profit(&self) -> Money {
        Money::from_cents(self.profit_cents)
    }

    /// Profit margin as a percentage of revenue.
    ///
    /// Zero revenue yields 0.0 rather than dividing by zero: a day with no
    /// sales has no margin, and an all-giveaway sale reports 0%.
    pub fn margin_percent(&self) -> f64 {
        if self.revenue_cents == 0 {
            return 0.0;
        }
        self.profit_cents as f64 / self.revenue_cents as f64 * 100.0
    }
}

// =============================================================================
// Dashboard KPIs
// =============================================================================

/// The sales-tab header figures, fetched in one call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesKpis {
    /// Revenue and profit over the whole ledger.
    pub all_time: RevenueSummary,
    /// Revenue and profit over sales committed today (local calendar day).
    pub today: RevenueSummary,
    /// The most recently committed sale, if any exist.
    pub latest_sale: Option<Sale>,
}

// =============================================================================
// Unit Tests
// =============================================================================
