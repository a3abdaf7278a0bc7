//! # Item Repository
//!
//! Database operations for catalog items.
//!
//! ## Key Operations
//! - Name search (prefix matches ranked first)
//! - Barcode lookup
//! - CRUD operations
//! - Cascading delete that keeps sale totals consistent
//!
//! ## Name Search
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    How Item Search Works                                │
//! │                                                                         │
//! │  User types: "cola"                                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  LIKE '%cola%' (wildcards in the query itself are escaped)              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                            │
//! │  │ items                                   │                            │
//! │  │                                         │                            │
//! │  │ Cola 330ml        │ 5449000000996      │ ← prefix match (rank 0)     │
//! │  │ Cola 1.5L         │ 5449000054227      │ ← prefix match (rank 0)     │
//! │  │ Pepsi Cola 330ml  │ 1234565601429      │ ← substring match (rank 1)  │
//! │  │ Chocolate Bar     │ 40111445           │                             │
//! │  └─────────────────────────────────────────┘                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Results: [Cola 1.5L, Cola 330ml, Pepsi Cola 330ml]                     │
//! │           (prefix block first, alphabetical inside each block)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::sale::recompute_sale_totals;
use dukkan_core::validation;
use dukkan_core::{CoreError, Item};

/// Repository for catalog item database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ItemRepository::new(pool);
///
/// // Search items
/// let results = repo.search("cola", 20).await?;
///
/// // Scanner lookup
/// let item = repo.get_by_barcode("5449000000996").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ItemRepository {
    pool: SqlitePool,
}

impl ItemRepository {
    /// Creates a new ItemRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ItemRepository { pool }
    }

    /// Searches items by name.
    ///
    /// ## How It Works
    /// 1. Trims the query; empty query falls back to [`list`](Self::list)
    /// 2. Escapes LIKE wildcards, so `100%` matches a literal percent sign
    /// 3. Matches substrings, but orders prefix matches first
    ///
    /// ## Arguments
    /// * `query` - Search term (can be partial)
    /// * `limit` - Maximum results to return
    ///
    /// ## Example
    /// ```rust,ignore
    /// // "cola" matches "Cola 330ml" before "Pepsi Cola 330ml"
    /// let items = repo.search("cola", 20).await?;
    ///
    /// // Empty query returns items sorted by name
    /// let items = repo.search("", 20).await?;
    /// ```
    pub async fn search(&self, query: &str, limit: u32) -> DbResult<Vec<Item>> {
        let query = validation::validate_search_query(query).map_err(CoreError::from)?;

        debug!(query = %query, limit = %limit, "Searching items");

        if query.is_empty() {
            return self.list(limit).await;
        }

        let escaped = escape_like(&query);
        let contains = format!("%{}%", escaped);
        let prefix = format!("{}%", escaped);

        let items = sqlx::query_as::<_, Item>(
            r#"
            SELECT id, name, category_id, barcode, price_cents, cost_cents,
                   stock_count, photo_path, created_at, updated_at
            FROM items
            WHERE name LIKE ?1 ESCAPE '\'
            ORDER BY CASE WHEN name LIKE ?2 ESCAPE '\' THEN 0 ELSE 1 END, name
            LIMIT ?3
            "#,
        )
        .bind(&contains)
        .bind(&prefix)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = items.len(), "Search returned items");
        Ok(items)
    }

    /// Lists items sorted by name.
    ///
    /// ## Usage
    /// Called when the search query is empty, and by catalog screens.
    pub async fn list(&self, limit: u32) -> DbResult<Vec<Item>> {
        let items = sqlx::query_as::<_, Item>(
            r#"
            SELECT id, name, category_id, barcode, price_cents, cost_cents,
                   stock_count, photo_path, created_at, updated_at
            FROM items
            ORDER BY name
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Gets an item by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(item))` - Item found
    /// * `Ok(None)` - No item with that ID
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Item>> {
        let item = sqlx::query_as::<_, Item>(
            r#"
            SELECT id, name, category_id, barcode, price_cents, cost_cents,
                   stock_count, photo_path, created_at, updated_at
            FROM items
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// Gets an item by barcode (exact match).
    ///
    /// ## Scanner Workflow
    /// ```text
    /// Scanner reads: "5449000000996"
    ///      │
    ///      ▼
    /// get_by_barcode("5449000000996")
    ///      │
    ///      ├── Found → add to bill at current price
    ///      └── None  → beep, show "unknown barcode"
    /// ```
    ///
    /// No format validation here: whatever the scanner hands us either
    /// matches a stored barcode or it doesn't.
    pub async fn get_by_barcode(&self, barcode: &str) -> DbResult<Option<Item>> {
        let barcode = barcode.trim();

        debug!(barcode = %barcode, "Looking up item by barcode");

        let item = sqlx::query_as::<_, Item>(
            r#"
            SELECT id, name, category_id, barcode, price_cents, cost_cents,
                   stock_count, photo_path, created_at, updated_at
            FROM items
            WHERE barcode = ?1
            "#,
        )
        .bind(barcode)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// Inserts a new item.
    ///
    /// ## Validation
    /// Runs `dukkan_core::validation::validate_item` first: empty name,
    /// malformed barcode, or negative price/cost/stock reject the insert
    /// before any row is written. Name and barcode are stored trimmed,
    /// exactly as validation saw them.
    ///
    /// ## Errors
    /// * `DbError::Core(Validation(_))` - Field validation failed
    /// * `DbError::UniqueViolation` - Barcode already exists
    ///
    /// ## Returns
    /// The inserted item as stored (name and barcode trimmed).
    pub async fn insert(&self, item: &Item) -> DbResult<Item> {
        validation::validate_item(item).map_err(CoreError::from)?;

        // Persist the trimmed form: barcode lookups and the UNIQUE
        // constraint compare exact bytes
        let mut stored = item.clone();
        stored.name = item.name.trim().to_string();
        stored.barcode = item.barcode.as_deref().map(|code| code.trim().to_string());

        debug!(id = %stored.id, name = %stored.name, "Inserting item");

        sqlx::query(
            r#"
            INSERT INTO items (
                id, name, category_id, barcode, price_cents, cost_cents,
                stock_count, photo_path, created_at, updated_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&stored.id)
        .bind(&stored.name)
        .bind(&stored.category_id)
        .bind(&stored.barcode)
        .bind(stored.price_cents)
        .bind(stored.cost_cents)
        .bind(stored.stock_count)
        .bind(&stored.photo_path)
        .bind(stored.created_at)
        .bind(stored.updated_at)
        .execute(&self.pool)
        .await?;

        debug!(id = %stored.id, "Item inserted");
        Ok(stored)
    }

    /// Updates an existing item.
    ///
    /// ## What Gets Updated
    /// All editable fields, with name and barcode stored trimmed.
    /// `updated_at` is set to now; `created_at` never changes. Stock edits
    /// here are absolute (manager corrections); sale commits and reversals
    /// adjust stock relatively in their own transactions.
    ///
    /// ## Errors
    /// * `DbError::Core(Validation(_))` - Field validation failed
    /// * `DbError::NotFound` - No item with that ID
    pub async fn update(&self, item: &Item) -> DbResult<()> {
        validation::validate_item(item).map_err(CoreError::from)?;

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE items
            SET name = ?1, category_id = ?2, barcode = ?3, price_cents = ?4,
                cost_cents = ?5, stock_count = ?6, photo_path = ?7, updated_at = ?8
            WHERE id = ?9
            "#,
        )
        .bind(item.name.trim())
        .bind(&item.category_id)
        .bind(item.barcode.as_deref().map(str::trim))
        .bind(item.price_cents)
        .bind(item.cost_cents)
        .bind(item.stock_count)
        .bind(&item.photo_path)
        .bind(now)
        .bind(&item.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Item", &item.id));
        }

        debug!(id = %item.id, "Item updated");
        Ok(())
    }

    /// Deletes an item and every sale line that references it.
    ///
    /// ## Why Cascade By Hand
    /// Historical sale lines snapshot the item's price and cost, but they
    /// still point at the item row. Deleting the item must take those lines
    /// with it AND recompute each touched sale's totals from the lines that
    /// remain, otherwise sale totals silently disagree with their lines.
    ///
    /// ## Transaction Steps
    /// ```text
    /// BEGIN
    ///   1. Load item name          → NotFound if missing, nothing written
    ///   2. Collect DISTINCT sale_id of lines referencing the item
    ///   3. DELETE those lines
    ///   4. Recompute totals for each collected sale
    ///   5. DELETE the item row
    /// COMMIT
    /// ```
    ///
    /// Stock is not restored: the item ceases to exist, so there is nothing
    /// to restock. Sales left with zero lines keep their row at zero totals.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        let name: Option<String> = sqlx::query_scalar("SELECT name FROM items WHERE id = ?1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        let name = match name {
            Some(name) => name,
            None => return Err(DbError::not_found("Item", id)),
        };

        let affected_sales: Vec<String> =
            sqlx::query_scalar("SELECT DISTINCT sale_id FROM sale_lines WHERE item_id = ?1")
                .bind(id)
                .fetch_all(&mut *tx)
                .await?;

        sqlx::query("DELETE FROM sale_lines WHERE item_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let now = Utc::now();
        for sale_id in &affected_sales {
            recompute_sale_totals(&mut tx, sale_id, now).await?;
        }

        sqlx::query("DELETE FROM items WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        debug!(
            id = %id,
            name = %name,
            sales_touched = affected_sales.len(),
            "Item deleted"
        );
        Ok(())
    }

    /// Counts all items.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Generates a new item ID (UUID v4).
pub fn generate_item_id() -> String {
    Uuid::new_v4().to_string()
}

/// Escapes LIKE wildcards so user input matches literally.
///
/// Backslash first, then `%` and `_`.
fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use dukkan_core::Bill;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn build_item(name: &str, barcode: Option<&str>, price: i64, cost: i64, stock: i64) -> Item {
        let now = Utc::now();
        Item {
            id: generate_item_id(),
            name: name.to_string(),
            category_id: None,
            barcode: barcode.map(|b| b.to_string()),
            price_cents: price,
            cost_cents: cost,
            stock_count: stock,
            photo_path: None,
            created_at: now,
            updated_at: now,
        }
    }

    async fn seed_item(
        db: &Database,
        name: &str,
        barcode: Option<&str>,
        price: i64,
        cost: i64,
        stock: i64,
    ) -> Item {
        db.items()
            .insert(&build_item(name, barcode, price, cost, stock))
            .await
            .unwrap()
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("cola"), "cola");
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
    }

    #[tokio::test]
    async fn test_insert_and_get_by_id() {
        let db = test_db().await;
        let item = seed_item(&db, "Cola 330ml", Some("5449000000996"), 250, 150, 24).await;

        let found = db.items().get_by_id(&item.id).await.unwrap().unwrap();
        assert_eq!(found.name, "Cola 330ml");
        assert_eq!(found.barcode.as_deref(), Some("5449000000996"));
        assert_eq!(found.price_cents, 250);
        assert_eq!(found.cost_cents, 150);
        assert_eq!(found.stock_count, 24);
    }

    #[tokio::test]
    async fn test_insert_rejects_invalid_item() {
        let db = test_db().await;

        let item = build_item("", None, 100, 50, 5);
        let err = db.items().insert(&item).await.unwrap_err();
        assert!(matches!(err, DbError::Core(_)));

        let item = build_item("Negative", None, -1, 50, 5);
        assert!(db.items().insert(&item).await.is_err());

        let item = build_item("Bad Barcode", Some("12345"), 100, 50, 5);
        assert!(db.items().insert(&item).await.is_err());

        assert_eq!(db.items().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_insert_duplicate_barcode_rejected() {
        let db = test_db().await;
        seed_item(&db, "Cola 330ml", Some("5449000000996"), 250, 150, 24).await;

        let dup = build_item("Other Cola", Some("5449000000996"), 300, 200, 10);
        let err = db.items().insert(&dup).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_padded_barcode_and_name_stored_trimmed() {
        let db = test_db().await;

        // Validation accepts padded input; the stored row must carry the
        // clean form or scanner lookups and UNIQUE never match it
        let item = seed_item(&db, "  Cola 330ml ", Some(" 5901234123457 "), 250, 150, 24).await;
        assert_eq!(item.name, "Cola 330ml");
        assert_eq!(item.barcode.as_deref(), Some("5901234123457"));

        let found = db
            .items()
            .get_by_barcode("5901234123457")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, item.id);
        assert_eq!(found.name, "Cola 330ml");

        // The trimmed twin is the same barcode
        let twin = build_item("Twin Cola", Some("5901234123457"), 300, 200, 10);
        let err = db.items().insert(&twin).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));

        // Updates normalize the same way
        let mut edited = found.clone();
        edited.name = " Cola 330ml Glass ".to_string();
        edited.barcode = Some(" 96385074 ".to_string());
        db.items().update(&edited).await.unwrap();

        let found = db.items().get_by_barcode("96385074").await.unwrap().unwrap();
        assert_eq!(found.name, "Cola 330ml Glass");
    }

    #[tokio::test]
    async fn test_get_by_barcode() {
        let db = test_db().await;
        seed_item(&db, "Cola 330ml", Some("5449000000996"), 250, 150, 24).await;

        let found = db.items().get_by_barcode("5449000000996").await.unwrap();
        assert_eq!(found.unwrap().name, "Cola 330ml");

        // Scanner input often carries stray whitespace
        let found = db.items().get_by_barcode(" 5449000000996 ").await.unwrap();
        assert!(found.is_some());

        let missing = db.items().get_by_barcode("0000000000000").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_search_ranks_prefix_before_substring() {
        let db = test_db().await;
        seed_item(&db, "Pepsi Cola 330ml", None, 240, 140, 10).await;
        seed_item(&db, "Cola 330ml", None, 250, 150, 10).await;
        seed_item(&db, "Chocolate Bar", None, 180, 90, 10).await;

        let hits = db.items().search("cola", 20).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].name, "Cola 330ml");
        assert_eq!(hits[1].name, "Pepsi Cola 330ml");
    }

    #[tokio::test]
    async fn test_search_empty_query_lists_all() {
        let db = test_db().await;
        seed_item(&db, "Bread", None, 120, 60, 10).await;
        seed_item(&db, "Apple", None, 80, 40, 10).await;

        let hits = db.items().search("  ", 20).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].name, "Apple");
    }

    #[tokio::test]
    async fn test_search_escapes_wildcards() {
        let db = test_db().await;
        seed_item(&db, "100% Juice", None, 350, 200, 10).await;
        seed_item(&db, "100 Proof Sauce", None, 400, 250, 10).await;

        let hits = db.items().search("100%", 20).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "100% Juice");
    }

    #[tokio::test]
    async fn test_update_item() {
        let db = test_db().await;
        let mut item = seed_item(&db, "Cola 330ml", Some("5449000000996"), 250, 150, 24).await;

        item.name = "Cola 330ml Can".to_string();
        item.price_cents = 275;
        item.stock_count = 30;
        db.items().update(&item).await.unwrap();

        let found = db.items().get_by_id(&item.id).await.unwrap().unwrap();
        assert_eq!(found.name, "Cola 330ml Can");
        assert_eq!(found.price_cents, 275);
        assert_eq!(found.stock_count, 30);
    }

    #[tokio::test]
    async fn test_update_missing_item_not_found() {
        let db = test_db().await;
        let item = build_item("Ghost", None, 100, 50, 5);

        let err = db.items().update(&item).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_missing_item_not_found() {
        let db = test_db().await;
        let err = db.items().delete("no-such-id").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_item_without_sales() {
        let db = test_db().await;
        let item = seed_item(&db, "Cola 330ml", None, 250, 150, 24).await;

        db.items().delete(&item.id).await.unwrap();

        assert!(db.items().get_by_id(&item.id).await.unwrap().is_none());
        assert_eq!(db.items().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_item_cascades_lines_and_recomputes_totals() {
        let db = test_db().await;
        let cola = seed_item(&db, "Cola 330ml", None, 500, 300, 10).await;
        let bread = seed_item(&db, "Bread", None, 120, 60, 10).await;

        let mut bill = Bill::new();
        bill.add_item(&cola, 2).unwrap();
        bill.add_item(&bread, 3).unwrap();
        let sale = db.sales().commit_bill(&bill).await.unwrap();
        assert_eq!(sale.total_cents, 2 * 500 + 3 * 120);

        db.items().delete(&cola.id).await.unwrap();

        // The sale survives with totals recomputed from the bread line only
        let sale = db.sales().get_by_id(&sale.id).await.unwrap().unwrap();
        assert_eq!(sale.total_cents, 3 * 120);
        assert_eq!(sale.total_cost_cents, 3 * 60);

        let lines = db.sales().lines(&sale.id).await.unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].item_id, bread.id);

        // Deleting an item never restocks it; bread stock is untouched too
        let bread = db.items().get_by_id(&bread.id).await.unwrap().unwrap();
        assert_eq!(bread.stock_count, 7);
    }
}
