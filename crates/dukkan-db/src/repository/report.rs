//! # Report Repository
//!
//! Read-only aggregation over the sales ledger. Nothing in this module
//! mutates; every figure is recomputed from the frozen snapshots on
//! `sale_lines`, so reports stay correct through catalog price edits,
//! line edits, and deletions.
//!
//! ## The Dashboard Queries
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  all_time()      Σ over every sale line                                 │
//! │  today()         Σ over lines of sales committed this local day         │
//! │  latest_sale()   newest sale row (created_at, id as tiebreak)           │
//! │  sale_summary()  Σ over one sale's lines                                │
//! │  kpis()          the three above in one call (dashboard header)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## "Today" Means The Local Day
//! The shopkeeper's day runs midnight to midnight on the till's wall
//! clock, not UTC. The window is computed in local time and converted to
//! UTC bounds, then applied as a half-open range `[start, end)` against
//! `sales.created_at`.

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use dukkan_core::{RevenueSummary, Sale, SalesKpis};

/// Repository for sales reporting queries.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    /// Creates a new ReportRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReportRepository { pool }
    }

    /// Revenue and profit over the entire ledger.
    pub async fn all_time(&self) -> DbResult<RevenueSummary> {
        let summary = sqlx::query_as::<_, RevenueSummary>(
            r#"
            SELECT COALESCE(SUM(line_total_cents), 0) AS revenue_cents,
                   COALESCE(SUM((unit_price_cents - unit_cost_cents) * quantity), 0) AS profit_cents
            FROM sale_lines
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(summary)
    }

    /// Revenue and profit for sales committed during the current local day.
    pub async fn today(&self) -> DbResult<RevenueSummary> {
        let (start, end) = today_bounds_utc(Local::now());

        debug!(start = %start, end = %end, "Computing today's summary");

        let summary = sqlx::query_as::<_, RevenueSummary>(
            r#"
            SELECT COALESCE(SUM(l.line_total_cents), 0) AS revenue_cents,
                   COALESCE(SUM((l.unit_price_cents - l.unit_cost_cents) * l.quantity), 0) AS profit_cents
            FROM sale_lines l
            INNER JOIN sales s ON s.id = l.sale_id
            WHERE s.created_at >= ?1 AND s.created_at < ?2
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;

        Ok(summary)
    }

    /// The most recently committed sale, if any.
    pub async fn latest_sale(&self) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, total_cents, total_cost_cents, created_at, updated_at
            FROM sales
            ORDER BY created_at DESC, id DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(sale)
    }

    /// Revenue and profit for a single sale.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - No sale with that ID
    pub async fn sale_summary(&self, sale_id: &str) -> DbResult<RevenueSummary> {
        let exists: Option<String> = sqlx::query_scalar("SELECT id FROM sales WHERE id = ?1")
            .bind(sale_id)
            .fetch_optional(&self.pool)
            .await?;

        if exists.is_none() {
            return Err(DbError::not_found("Sale", sale_id));
        }

        let summary = sqlx::query_as::<_, RevenueSummary>(
            r#"
            SELECT COALESCE(SUM(line_total_cents), 0) AS revenue_cents,
                   COALESCE(SUM((unit_price_cents - unit_cost_cents) * quantity), 0) AS profit_cents
            FROM sale_lines
            WHERE sale_id = ?1
            "#,
        )
        .bind(sale_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(summary)
    }

    /// All dashboard-header figures in one call.
    pub async fn kpis(&self) -> DbResult<SalesKpis> {
        let all_time = self.all_time().await?;
        let today = self.today().await?;
        let latest_sale = self.latest_sale().await?;

        Ok(SalesKpis {
            all_time,
            today,
            latest_sale,
        })
    }
}

// =============================================================================
// Day Window
// =============================================================================

/// UTC bounds of the local calendar day containing `now`, half-open.
pub(crate) fn today_bounds_utc(now: DateTime<Local>) -> (DateTime<Utc>, DateTime<Utc>) {
    let today = now.date_naive();
    let tomorrow = today.succ_opt().unwrap_or(today);

    (local_midnight_utc(today), local_midnight_utc(tomorrow))
}

/// The instant the given local day begins, in UTC.
///
/// DST makes local midnight tricky: a fall-back fold has two midnights
/// (take the earlier), and a spring-forward gap can skip midnight entirely
/// (the day then starts when the clocks land, one hour later on every
/// real-world timetable).
fn local_midnight_utc(day: NaiveDate) -> DateTime<Utc> {
    let midnight = day.and_time(NaiveTime::MIN);

    Local
        .from_local_datetime(&midnight)
        .earliest()
        .or_else(|| {
            Local
                .from_local_datetime(&(midnight + Duration::hours(1)))
                .earliest()
        })
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&midnight))
}

// =============================================================================
// Unit Tests
// =============================================================================
