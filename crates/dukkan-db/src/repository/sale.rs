//! # Sale Repository
//!
//! Database operations for committed sales and their lines.
//!
//! ## Commit Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       commit_bill(&bill)                                │
//! │                                                                         │
//! │  0. PARTITION (before the transaction)                                  │
//! │     └── custom lines dropped, catalog lines kept                        │
//! │     └── nothing left to persist → NothingToCommit                       │
//! │                                                                         │
//! │  1. BEGIN TRANSACTION                                                   │
//! │                                                                         │
//! │  2. PER CATALOG LINE, IN ORDER                                          │
//! │     └── load item row      → missing → ItemNotFound, rollback           │
//! │     └── quantity > stock   → InsufficientStock, rollback                │
//! │     └── decrement stock                                                 │
//! │     └── snapshot current price/cost onto the new line                   │
//! │                                                                         │
//! │  3. INSERT sale row (totals summed from the snapshots)                  │
//! │     INSERT one sale_lines row per catalog line                          │
//! │                                                                         │
//! │  4. COMMIT → Sale returned; caller clears its bill                      │
//! │                                                                         │
//! │  Any error before COMMIT rolls everything back: stock, sale and         │
//! │  lines change together or not at all.                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Reversals
//! Every reversal is one transaction too:
//! - `delete_sale` restores stock for every line, then removes the sale
//! - `delete_line` restores one line's stock and recomputes the sale totals
//! - `update_line` applies the quantity delta to stock and reprices the line
//!
//! Because each line froze `unit_cost_cents` at commit time, edits can
//! change quantity and price freely without corrupting historical profit.

use chrono::{DateTime, Utc};
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use dukkan_core::validation;
use dukkan_core::{Bill, CoreError, Sale, SaleLine, SaleLineDetail};

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    // =========================================================================
    // Commit
    // =========================================================================

    /// Commits a bill as a permanent sale.
    ///
    /// ## What Persists
    /// Only catalog-backed lines. Custom lines exist for the customer-facing
    /// total during the session and are discarded here. A bill with no
    /// catalog lines has nothing to persist and fails with
    /// `NothingToCommit` before the transaction even opens.
    ///
    /// ## Snapshot Semantics
    /// Each line freezes the item's price and cost *as they are now*, not
    /// as they were when the line was added to the bill. If the price
    /// changed mid-session, the committed ledger reflects the catalog at
    /// commit time.
    ///
    /// ## Stock Semantics
    /// Lines are checked and decremented sequentially against
    /// in-transaction state, so two lines selling the same item cannot
    /// jointly overdraw it: the second line sees the stock the first one
    /// left behind.
    ///
    /// ## Errors
    /// * `DbError::Core(NothingToCommit)` - No catalog lines on the bill
    /// * `DbError::Core(ItemNotFound)` - A line references a deleted item
    /// * `DbError::Core(InsufficientStock)` - A line exceeds current stock
    /// * `DbError::Core(Validation(_))` - A line quantity is out of range
    ///
    /// All of them leave the database untouched.
    pub async fn commit_bill(&self, bill: &Bill) -> DbResult<Sale> {
        let catalog_lines: Vec<(&str, i64)> = bill
            .lines
            .iter()
            .filter_map(|line| line.item_id().map(|id| (id, line.quantity())))
            .collect();

        if catalog_lines.is_empty() {
            return Err(CoreError::NothingToCommit.into());
        }

        // `lines` is a public field; re-validate quantities so a hand-built
        // line fails as a domain error before any row changes
        for (_, quantity) in &catalog_lines {
            validation::validate_quantity(*quantity).map_err(CoreError::from)?;
        }

        let sale_id = generate_sale_id();
        let now = Utc::now();

        debug!(sale_id = %sale_id, lines = catalog_lines.len(), "Committing bill");

        let mut tx = self.pool.begin().await?;

        let mut total_cents: i64 = 0;
        let mut total_cost_cents: i64 = 0;
        let mut lines: Vec<SaleLine> = Vec::with_capacity(catalog_lines.len());

        for (item_id, quantity) in catalog_lines {
            let row: Option<(String, i64, i64, i64)> = sqlx::query_as(
                "SELECT name, price_cents, cost_cents, stock_count FROM items WHERE id = ?1",
            )
            .bind(item_id)
            .fetch_optional(&mut *tx)
            .await?;

            let (name, price_cents, cost_cents, stock_count) = match row {
                Some(row) => row,
                None => return Err(CoreError::ItemNotFound(item_id.to_string()).into()),
            };

            if quantity > stock_count {
                return Err(CoreError::InsufficientStock {
                    name,
                    available: stock_count,
                    requested: quantity,
                }
                .into());
            }

            sqlx::query(
                "UPDATE items SET stock_count = stock_count - ?1, updated_at = ?2 WHERE id = ?3",
            )
            .bind(quantity)
            .bind(now)
            .bind(item_id)
            .execute(&mut *tx)
            .await?;

            let line_total_cents = price_cents * quantity;
            total_cents += line_total_cents;
            total_cost_cents += cost_cents * quantity;

            lines.push(SaleLine {
                id: generate_line_id(),
                sale_id: sale_id.clone(),
                item_id: item_id.to_string(),
                quantity,
                unit_price_cents: price_cents,
                unit_cost_cents: cost_cents,
                line_total_cents,
                created_at: now,
            });
        }

        sqlx::query(
            r#"
            INSERT INTO sales (id, total_cents, total_cost_cents, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&sale_id)
        .bind(total_cents)
        .bind(total_cost_cents)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        for line in &lines {
            sqlx::query(
                r#"
                INSERT INTO sale_lines (
                    id, sale_id, item_id, quantity,
                    unit_price_cents, unit_cost_cents, line_total_cents, created_at
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
            )
            .bind(&line.id)
            .bind(&line.sale_id)
            .bind(&line.item_id)
            .bind(line.quantity)
            .bind(line.unit_price_cents)
            .bind(line.unit_cost_cents)
            .bind(line.line_total_cents)
            .bind(line.created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!(
            sale_id = %sale_id,
            total_cents = total_cents,
            lines = lines.len(),
            "Bill committed"
        );

        Ok(Sale {
            id: sale_id,
            total_cents,
            total_cost_cents,
            created_at: now,
            updated_at: now,
        })
    }

    // =========================================================================
    // Reversals
    // =========================================================================

    /// Deletes a sale and restores stock for every line.
    ///
    /// ## Transaction Steps
    /// ```text
    /// BEGIN
    ///   1. Sale exists?                   → NotFound if missing
    ///   2. For each line: stock += qty    (every line's item still exists;
    ///                                      item deletion cascades lines away)
    ///   3. DELETE the lines
    ///   4. DELETE the sale
    /// COMMIT
    /// ```
    pub async fn delete_sale(&self, sale_id: &str) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        let exists: Option<String> = sqlx::query_scalar("SELECT id FROM sales WHERE id = ?1")
            .bind(sale_id)
            .fetch_optional(&mut *tx)
            .await?;

        if exists.is_none() {
            return Err(DbError::not_found("Sale", sale_id));
        }

        let lines: Vec<(String, i64)> =
            sqlx::query_as("SELECT item_id, quantity FROM sale_lines WHERE sale_id = ?1")
                .bind(sale_id)
                .fetch_all(&mut *tx)
                .await?;

        let now = Utc::now();
        for (item_id, quantity) in &lines {
            sqlx::query(
                "UPDATE items SET stock_count = stock_count + ?1, updated_at = ?2 WHERE id = ?3",
            )
            .bind(quantity)
            .bind(now)
            .bind(item_id)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query("DELETE FROM sale_lines WHERE sale_id = ?1")
            .bind(sale_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM sales WHERE id = ?1")
            .bind(sale_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(sale_id = %sale_id, lines = lines.len(), "Sale deleted, stock restored");
        Ok(())
    }

    /// Deletes a single sale line, restores its stock, and recomputes the
    /// owning sale's totals from the lines that remain.
    ///
    /// A sale may legitimately end up with zero lines and zero totals; it
    /// is kept, not auto-deleted, so the ledger row count stays honest.
    pub async fn delete_line(&self, line_id: &str) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        let line: Option<(String, String, i64)> =
            sqlx::query_as("SELECT sale_id, item_id, quantity FROM sale_lines WHERE id = ?1")
                .bind(line_id)
                .fetch_optional(&mut *tx)
                .await?;

        let (sale_id, item_id, quantity) = match line {
            Some(line) => line,
            None => return Err(DbError::not_found("Sale line", line_id)),
        };

        let now = Utc::now();

        sqlx::query(
            "UPDATE items SET stock_count = stock_count + ?1, updated_at = ?2 WHERE id = ?3",
        )
        .bind(quantity)
        .bind(now)
        .bind(&item_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM sale_lines WHERE id = ?1")
            .bind(line_id)
            .execute(&mut *tx)
            .await?;

        recompute_sale_totals(&mut tx, &sale_id, now).await?;

        tx.commit().await?;

        debug!(
            line_id = %line_id,
            sale_id = %sale_id,
            quantity = quantity,
            "Sale line deleted, stock restored"
        );
        Ok(())
    }

    /// Edits a committed line's quantity and unit price.
    ///
    /// ## Stock Delta
    /// `delta = new_quantity − old_quantity`. A positive delta sells more
    /// units and must fit the item's current stock (`InsufficientStock`
    /// reports the *additional* units as `requested`). A negative delta
    /// gives units back.
    ///
    /// ## What Never Changes
    /// `unit_cost_cents` keeps its commit-time snapshot. Repricing a line
    /// months later must not rewrite what the goods actually cost, or every
    /// historical profit figure drifts.
    pub async fn update_line(
        &self,
        line_id: &str,
        new_quantity: i64,
        new_price_cents: i64,
    ) -> DbResult<()> {
        validation::validate_quantity(new_quantity).map_err(CoreError::from)?;
        validation::validate_price_cents(new_price_cents).map_err(CoreError::from)?;

        let mut tx = self.pool.begin().await?;

        let line: Option<(String, String, i64)> =
            sqlx::query_as("SELECT sale_id, item_id, quantity FROM sale_lines WHERE id = ?1")
                .bind(line_id)
                .fetch_optional(&mut *tx)
                .await?;

        let (sale_id, item_id, old_quantity) = match line {
            Some(line) => line,
            None => return Err(DbError::not_found("Sale line", line_id)),
        };

        let item: Option<(String, i64)> =
            sqlx::query_as("SELECT name, stock_count FROM items WHERE id = ?1")
                .bind(&item_id)
                .fetch_optional(&mut *tx)
                .await?;

        let (item_name, stock_count) = match item {
            Some(item) => item,
            None => return Err(CoreError::ItemNotFound(item_id.clone()).into()),
        };

        let delta = new_quantity - old_quantity;

        if delta > 0 && delta > stock_count {
            return Err(CoreError::InsufficientStock {
                name: item_name,
                available: stock_count,
                requested: delta,
            }
            .into());
        }

        let now = Utc::now();

        sqlx::query(
            "UPDATE items SET stock_count = stock_count - ?1, updated_at = ?2 WHERE id = ?3",
        )
        .bind(delta)
        .bind(now)
        .bind(&item_id)
        .execute(&mut *tx)
        .await?;

        let line_total_cents = new_price_cents * new_quantity;

        sqlx::query(
            r#"
            UPDATE sale_lines
            SET quantity = ?1, unit_price_cents = ?2, line_total_cents = ?3
            WHERE id = ?4
            "#,
        )
        .bind(new_quantity)
        .bind(new_price_cents)
        .bind(line_total_cents)
        .bind(line_id)
        .execute(&mut *tx)
        .await?;

        recompute_sale_totals(&mut tx, &sale_id, now).await?;

        tx.commit().await?;

        debug!(
            line_id = %line_id,
            old_quantity = old_quantity,
            new_quantity = new_quantity,
            new_price_cents = new_price_cents,
            "Sale line updated"
        );
        Ok(())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Gets a sale by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, total_cents, total_cost_cents, created_at, updated_at
            FROM sales
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sale)
    }

    /// Lists sales, newest first.
    pub async fn list(&self, limit: u32) -> DbResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, total_cents, total_cost_cents, created_at, updated_at
            FROM sales
            ORDER BY created_at DESC, id DESC
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Gets all lines of a sale.
    pub async fn lines(&self, sale_id: &str) -> DbResult<Vec<SaleLine>> {
        let lines = sqlx::query_as::<_, SaleLine>(
            r#"
            SELECT id, sale_id, item_id, quantity,
                   unit_price_cents, unit_cost_cents, line_total_cents, created_at
            FROM sale_lines
            WHERE sale_id = ?1
            ORDER BY created_at, id
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    /// Gets a single line by ID.
    pub async fn get_line(&self, line_id: &str) -> DbResult<Option<SaleLine>> {
        let line = sqlx::query_as::<_, SaleLine>(
            r#"
            SELECT id, sale_id, item_id, quantity,
                   unit_price_cents, unit_cost_cents, line_total_cents, created_at
            FROM sale_lines
            WHERE id = ?1
            "#,
        )
        .bind(line_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(line)
    }

    /// Gets a sale's lines joined with current item names, for detail views.
    ///
    /// The join is INNER on purpose: deleting an item cascades its lines
    /// away, so a surviving line always has an item row.
    pub async fn line_details(&self, sale_id: &str) -> DbResult<Vec<SaleLineDetail>> {
        let details = sqlx::query_as::<_, SaleLineDetail>(
            r#"
            SELECT l.id, l.sale_id, l.item_id, i.name AS item_name,
                   l.quantity, l.unit_price_cents, l.unit_cost_cents,
                   l.line_total_cents, l.created_at
            FROM sale_lines l
            INNER JOIN items i ON i.id = l.item_id
            WHERE l.sale_id = ?1
            ORDER BY l.created_at, l.id
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(details)
    }
}

// =============================================================================
// Shared Helpers
// =============================================================================

/// Rewrites a sale's stored totals from whatever lines it has left.
///
/// Runs inside the caller's transaction so the totals can never be observed
/// out of step with the lines. Used by line deletion, line edits, and the
/// item cascade delete.
pub(crate) async fn recompute_sale_totals(
    tx: &mut Transaction<'_, Sqlite>,
    sale_id: &str,
    now: DateTime<Utc>,
) -> DbResult<()> {
    sqlx::query(
        r#"
        UPDATE sales
        SET total_cents = (
                SELECT COALESCE(SUM(line_total_cents), 0)
                FROM sale_lines
                WHERE sale_id = ?1
            ),
            total_cost_cents = (
                SELECT COALESCE(SUM(unit_cost_cents * quantity), 0)
                FROM sale_lines
                WHERE sale_id = ?1
            ),
            updated_at = ?2
        WHERE id = ?1
        "#,
    )
    .bind(sale_id)
    .bind(now)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

/// Generates a new sale ID (UUID v4).
pub fn generate_sale_id() -> String {
    Uuid::new_v4().to_string()
}

/// Generates a new sale line ID (UUID v4).
pub fn generate_line_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::item::generate_item_id;
    use dukkan_core::{BillLine, Item, Money};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn seed_item(db: &Database, name: &str, price: i64, cost: i64, stock: i64) -> Item {
        let now = Utc::now();
        let item = Item {
            id: generate_item_id(),
            name: name.to_string(),
            category_id: None,
            barcode: None,
            price_cents: price,
            cost_cents: cost,
            stock_count: stock,
            photo_path: None,
            created_at: now,
            updated_at: now,
        };
        db.items().insert(&item).await.unwrap()
    }

    #[tokio::test]
    async fn test_commit_bill_decrements_stock_and_snapshots() {
        let db = test_db().await;
        let widget = seed_item(&db, "Widget", 500, 300, 10).await;

        let mut bill = Bill::new();
        bill.add_item(&widget, 4).unwrap();
        let sale = db.sales().commit_bill(&bill).await.unwrap();

        assert_eq!(sale.total_cents, 2000);
        assert_eq!(sale.total_cost_cents, 1200);
        assert_eq!(sale.profit_cents(), 800);

        let widget = db.items().get_by_id(&widget.id).await.unwrap().unwrap();
        assert_eq!(widget.stock_count, 6);

        let lines = db.sales().lines(&sale.id).await.unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 4);
        assert_eq!(lines[0].unit_price_cents, 500);
        assert_eq!(lines[0].unit_cost_cents, 300);
        assert_eq!(lines[0].line_total_cents, 2000);
    }

    #[tokio::test]
    async fn test_commit_insufficient_stock_changes_nothing() {
        let db = test_db().await;
        let widget = seed_item(&db, "Widget", 500, 300, 6).await;

        // The bill was built when stock allowed 6; by commit time the
        // caller asks for 7 (another till sold one, say)
        let gadget = seed_item(&db, "Gadget", 100, 50, 100).await;
        let mut bill = Bill::new();
        bill.add_item(&gadget, 2).unwrap();
        bill.add_catalog_line(&widget, 6, widget.price()).unwrap();

        // Shrink stock behind the bill's back
        let mut drained = widget.clone();
        drained.stock_count = 5;
        db.items().update(&drained).await.unwrap();

        let err = db.sales().commit_bill(&bill).await.unwrap_err();
        match err {
            DbError::Core(CoreError::InsufficientStock {
                available,
                requested,
                ..
            }) => {
                assert_eq!(available, 5);
                assert_eq!(requested, 6);
            }
            other => panic!("unexpected error: {other:?}"),
        }

        // Rollback: no sale, and the earlier gadget decrement is undone
        assert_eq!(db.sales().list(10).await.unwrap().len(), 0);
        let gadget = db.items().get_by_id(&gadget.id).await.unwrap().unwrap();
        assert_eq!(gadget.stock_count, 100);
    }

    #[tokio::test]
    async fn test_commit_same_item_twice_cannot_overdraw() {
        let db = test_db().await;
        let widget = seed_item(&db, "Widget", 500, 300, 10).await;

        // Two lines of 6 pass no single-line check, but together want 12
        let mut bill = Bill::new();
        bill.add_catalog_line(&widget, 6, widget.price()).unwrap();
        let err = bill.add_catalog_line(&widget, 6, widget.price()).unwrap_err();
        assert!(matches!(err, CoreError::InsufficientStock { .. }));

        // Force the same shape past the session check via two bills' worth
        // of state: build the lines directly against a stale item snapshot
        let mut stale = widget.clone();
        stale.stock_count = 100;
        let mut bill = Bill::new();
        bill.add_catalog_line(&stale, 6, stale.price()).unwrap();
        bill.add_catalog_line(&stale, 6, stale.price()).unwrap();

        let err = db.sales().commit_bill(&bill).await.unwrap_err();
        match err {
            DbError::Core(CoreError::InsufficientStock {
                available,
                requested,
                ..
            }) => {
                // Second line sees the 4 the first line left behind
                assert_eq!(available, 4);
                assert_eq!(requested, 6);
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let widget = db.items().get_by_id(&widget.id).await.unwrap().unwrap();
        assert_eq!(widget.stock_count, 10);
    }

    #[tokio::test]
    async fn test_commit_snapshots_price_at_commit_time() {
        let db = test_db().await;
        let widget = seed_item(&db, "Widget", 500, 300, 10).await;

        let mut bill = Bill::new();
        bill.add_item(&widget, 2).unwrap();

        // Price changes between add and commit
        let mut repriced = widget.clone();
        repriced.price_cents = 600;
        db.items().update(&repriced).await.unwrap();

        let sale = db.sales().commit_bill(&bill).await.unwrap();
        assert_eq!(sale.total_cents, 1200);

        let lines = db.sales().lines(&sale.id).await.unwrap();
        assert_eq!(lines[0].unit_price_cents, 600);
    }

    #[tokio::test]
    async fn test_catalog_edits_after_commit_leave_snapshots_alone() {
        let db = test_db().await;
        let widget = seed_item(&db, "Widget", 500, 300, 10).await;

        let mut bill = Bill::new();
        bill.add_item(&widget, 4).unwrap();
        let sale = db.sales().commit_bill(&bill).await.unwrap();

        let mut repriced = widget.clone();
        repriced.price_cents = 900;
        repriced.cost_cents = 700;
        db.items().update(&repriced).await.unwrap();

        let lines = db.sales().lines(&sale.id).await.unwrap();
        assert_eq!(lines[0].unit_price_cents, 500);
        assert_eq!(lines[0].unit_cost_cents, 300);
        assert_eq!(lines[0].line_total_cents, 2000);

        let sale = db.sales().get_by_id(&sale.id).await.unwrap().unwrap();
        assert_eq!(sale.total_cents, 2000);
        assert_eq!(sale.total_cost_cents, 1200);
    }

    #[tokio::test]
    async fn test_commit_custom_lines_are_not_persisted() {
        let db = test_db().await;
        let widget = seed_item(&db, "Widget", 500, 300, 10).await;

        let mut bill = Bill::new();
        bill.add_item(&widget, 1).unwrap();
        bill.add_custom_line("Delivery fee", None, 1, Money::from_cents(700))
            .unwrap();

        // Displayed total includes the custom line
        assert_eq!(bill.total_cents(), 1200);

        // Committed total does not
        let sale = db.sales().commit_bill(&bill).await.unwrap();
        assert_eq!(sale.total_cents, 500);
        assert_eq!(db.sales().lines(&sale.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_commit_custom_only_bill_is_nothing_to_commit() {
        let db = test_db().await;

        let mut bill = Bill::new();
        bill.add_custom_line("Delivery fee", None, 1, Money::from_cents(700))
            .unwrap();

        let err = db.sales().commit_bill(&bill).await.unwrap_err();
        assert!(matches!(err, DbError::Core(CoreError::NothingToCommit)));

        let err = db.sales().commit_bill(&Bill::new()).await.unwrap_err();
        assert!(matches!(err, DbError::Core(CoreError::NothingToCommit)));
    }

    #[tokio::test]
    async fn test_commit_rejects_nonpositive_line_quantity() {
        let db = test_db().await;
        let widget = seed_item(&db, "Widget", 500, 300, 10).await;

        // `lines` is public; a hand-built line can carry a quantity no
        // add_* method would accept
        for bad_quantity in [0, -3] {
            let mut bill = Bill::new();
            bill.add_item(&widget, 1).unwrap();
            bill.lines
                .push(BillLine::from_item(&widget, bad_quantity, widget.price()));

            let err = db.sales().commit_bill(&bill).await.unwrap_err();
            assert!(matches!(err, DbError::Core(CoreError::Validation(_))));
        }

        // Neither attempt wrote anything
        assert_eq!(db.sales().list(10).await.unwrap().len(), 0);
        let widget = db.items().get_by_id(&widget.id).await.unwrap().unwrap();
        assert_eq!(widget.stock_count, 10);
    }

    #[tokio::test]
    async fn test_commit_deleted_item_aborts() {
        let db = test_db().await;
        let widget = seed_item(&db, "Widget", 500, 300, 10).await;
        let gadget = seed_item(&db, "Gadget", 100, 50, 10).await;

        let mut bill = Bill::new();
        bill.add_item(&gadget, 1).unwrap();
        bill.add_item(&widget, 1).unwrap();

        db.items().delete(&widget.id).await.unwrap();

        let err = db.sales().commit_bill(&bill).await.unwrap_err();
        assert!(matches!(err, DbError::Core(CoreError::ItemNotFound(_))));

        let gadget = db.items().get_by_id(&gadget.id).await.unwrap().unwrap();
        assert_eq!(gadget.stock_count, 10);
    }

    #[tokio::test]
    async fn test_delete_sale_restores_stock() {
        let db = test_db().await;
        let widget = seed_item(&db, "Widget", 500, 300, 10).await;

        let mut bill = Bill::new();
        bill.add_item(&widget, 4).unwrap();
        let sale = db.sales().commit_bill(&bill).await.unwrap();

        db.sales().delete_sale(&sale.id).await.unwrap();

        let widget = db.items().get_by_id(&widget.id).await.unwrap().unwrap();
        assert_eq!(widget.stock_count, 10);
        assert!(db.sales().get_by_id(&sale.id).await.unwrap().is_none());
        assert!(db.sales().lines(&sale.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_sale_not_found() {
        let db = test_db().await;
        let err = db.sales().delete_sale("no-such-sale").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_line_restores_stock_and_recomputes() {
        let db = test_db().await;
        let widget = seed_item(&db, "Widget", 500, 300, 10).await;
        let gadget = seed_item(&db, "Gadget", 100, 50, 10).await;

        let mut bill = Bill::new();
        bill.add_item(&widget, 4).unwrap();
        bill.add_item(&gadget, 2).unwrap();
        let sale = db.sales().commit_bill(&bill).await.unwrap();
        assert_eq!(sale.total_cents, 2200);

        let lines = db.sales().lines(&sale.id).await.unwrap();
        let widget_line = lines.iter().find(|l| l.item_id == widget.id).unwrap();
        db.sales().delete_line(&widget_line.id).await.unwrap();

        let widget = db.items().get_by_id(&widget.id).await.unwrap().unwrap();
        assert_eq!(widget.stock_count, 10);

        let sale = db.sales().get_by_id(&sale.id).await.unwrap().unwrap();
        assert_eq!(sale.total_cents, 200);
        assert_eq!(sale.total_cost_cents, 100);
    }

    #[tokio::test]
    async fn test_delete_last_line_keeps_zeroed_sale() {
        let db = test_db().await;
        let widget = seed_item(&db, "Widget", 500, 300, 10).await;

        let mut bill = Bill::new();
        bill.add_item(&widget, 4).unwrap();
        let sale = db.sales().commit_bill(&bill).await.unwrap();

        let lines = db.sales().lines(&sale.id).await.unwrap();
        db.sales().delete_line(&lines[0].id).await.unwrap();

        // The sale row survives at zero; it is not auto-deleted
        let sale = db.sales().get_by_id(&sale.id).await.unwrap().unwrap();
        assert_eq!(sale.total_cents, 0);
        assert_eq!(sale.total_cost_cents, 0);
        assert!(db.sales().lines(&sale.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_line_shrink_returns_stock() {
        let db = test_db().await;
        let widget = seed_item(&db, "Widget", 500, 300, 10).await;

        let mut bill = Bill::new();
        bill.add_item(&widget, 4).unwrap();
        let sale = db.sales().commit_bill(&bill).await.unwrap();

        let lines = db.sales().lines(&sale.id).await.unwrap();
        db.sales().update_line(&lines[0].id, 2, 500).await.unwrap();

        let widget = db.items().get_by_id(&widget.id).await.unwrap().unwrap();
        assert_eq!(widget.stock_count, 8);

        let sale = db.sales().get_by_id(&sale.id).await.unwrap().unwrap();
        assert_eq!(sale.total_cents, 1000);
        assert_eq!(sale.total_cost_cents, 600);
    }

    #[tokio::test]
    async fn test_update_line_grow_checks_stock() {
        let db = test_db().await;
        let widget = seed_item(&db, "Widget", 500, 300, 10).await;

        let mut bill = Bill::new();
        bill.add_item(&widget, 4).unwrap();
        let sale = db.sales().commit_bill(&bill).await.unwrap();
        // 6 left in stock

        let lines = db.sales().lines(&sale.id).await.unwrap();

        // Growing 4 → 12 needs 8 more, only 6 available
        let err = db
            .sales()
            .update_line(&lines[0].id, 12, 500)
            .await
            .unwrap_err();
        match err {
            DbError::Core(CoreError::InsufficientStock {
                available,
                requested,
                ..
            }) => {
                assert_eq!(available, 6);
                assert_eq!(requested, 8);
            }
            other => panic!("unexpected error: {other:?}"),
        }

        // Nothing changed
        let line = db.sales().get_line(&lines[0].id).await.unwrap().unwrap();
        assert_eq!(line.quantity, 4);
        let widget = db.items().get_by_id(&widget.id).await.unwrap().unwrap();
        assert_eq!(widget.stock_count, 6);

        // Growing 4 → 10 needs exactly the 6 available: allowed
        db.sales().update_line(&lines[0].id, 10, 500).await.unwrap();
        let widget = db.items().get_by_id(&widget.id).await.unwrap().unwrap();
        assert_eq!(widget.stock_count, 0);
    }

    #[tokio::test]
    async fn test_update_line_reprices_but_keeps_cost_snapshot() {
        let db = test_db().await;
        let widget = seed_item(&db, "Widget", 500, 300, 10).await;

        let mut bill = Bill::new();
        bill.add_item(&widget, 4).unwrap();
        let sale = db.sales().commit_bill(&bill).await.unwrap();

        let lines = db.sales().lines(&sale.id).await.unwrap();
        db.sales().update_line(&lines[0].id, 3, 450).await.unwrap();

        let line = db.sales().get_line(&lines[0].id).await.unwrap().unwrap();
        assert_eq!(line.quantity, 3);
        assert_eq!(line.unit_price_cents, 450);
        assert_eq!(line.line_total_cents, 1350);
        // Cost snapshot survives the edit
        assert_eq!(line.unit_cost_cents, 300);

        let sale = db.sales().get_by_id(&sale.id).await.unwrap().unwrap();
        assert_eq!(sale.total_cents, 1350);
        assert_eq!(sale.total_cost_cents, 900);
    }

    #[tokio::test]
    async fn test_update_line_rejects_bad_input() {
        let db = test_db().await;
        let widget = seed_item(&db, "Widget", 500, 300, 10).await;

        let mut bill = Bill::new();
        bill.add_item(&widget, 4).unwrap();
        let sale = db.sales().commit_bill(&bill).await.unwrap();
        let lines = db.sales().lines(&sale.id).await.unwrap();

        assert!(db.sales().update_line(&lines[0].id, 0, 500).await.is_err());
        assert!(db.sales().update_line(&lines[0].id, -1, 500).await.is_err());
        assert!(db.sales().update_line(&lines[0].id, 2, -10).await.is_err());

        let line = db.sales().get_line(&lines[0].id).await.unwrap().unwrap();
        assert_eq!(line.quantity, 4);
        assert_eq!(line.unit_price_cents, 500);
    }

    #[tokio::test]
    async fn test_update_missing_line_not_found() {
        let db = test_db().await;
        let err = db
            .sales()
            .update_line("no-such-line", 2, 100)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let db = test_db().await;
        let widget = seed_item(&db, "Widget", 500, 300, 100).await;

        for qty in [1, 2, 3] {
            let mut bill = Bill::new();
            bill.add_item(&widget, qty).unwrap();
            db.sales().commit_bill(&bill).await.unwrap();
        }

        let sales = db.sales().list(10).await.unwrap();
        assert_eq!(sales.len(), 3);
        assert!(sales[0].created_at >= sales[1].created_at);
        assert!(sales[1].created_at >= sales[2].created_at);
    }

    #[tokio::test]
    async fn test_line_details_join_item_name() {
        let db = test_db().await;
        let widget = seed_item(&db, "Widget", 500, 300, 10).await;

        let mut bill = Bill::new();
        bill.add_item(&widget, 2).unwrap();
        let sale = db.sales().commit_bill(&bill).await.unwrap();

        let details = db.sales().line_details(&sale.id).await.unwrap();
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].item_name, "Widget");
        assert_eq!(details[0].line_total_cents, 1000);
        assert_eq!(details[0].profit_cents(), 400);
    }
}
