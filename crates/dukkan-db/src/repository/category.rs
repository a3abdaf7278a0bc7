//! # Category Repository
//!
//! Database operations for item categories.
//!
//! Categories are lightweight grouping rows. The catalog UI creates them
//! on demand while editing an item, so `get_by_name` exists to support a
//! find-or-create flow without a separate management screen.

use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use dukkan_core::validation;
use dukkan_core::{Category, CoreError};

/// Repository for category database operations.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    /// Creates a new CategoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CategoryRepository { pool }
    }

    /// Inserts a new category.
    ///
    /// ## Errors
    /// * `DbError::Core(Validation(_))` - Empty or oversized name
    /// * `DbError::UniqueViolation` - Name already exists
    pub async fn insert(&self, category: &Category) -> DbResult<Category> {
        validation::validate_category_name(&category.name).map_err(CoreError::from)?;

        // Stored trimmed so `get_by_name` and UNIQUE compare exact bytes
        let mut stored = category.clone();
        stored.name = category.name.trim().to_string();

        sqlx::query(
            r#"
            INSERT INTO categories (id, name, created_at)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(&stored.id)
        .bind(&stored.name)
        .bind(stored.created_at)
        .execute(&self.pool)
        .await?;

        debug!(id = %stored.id, name = %stored.name, "Category inserted");
        Ok(stored)
    }

    /// Lists all categories sorted by name.
    pub async fn list(&self) -> DbResult<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, created_at
            FROM categories
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    /// Gets a category by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, created_at
            FROM categories
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    /// Gets a category by exact name.
    ///
    /// Names are UNIQUE, so this returns at most one row. Used by the
    /// find-or-create flow when editing an item's category.
    pub async fn get_by_name(&self, name: &str) -> DbResult<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, created_at
            FROM categories
            WHERE name = ?1
            "#,
        )
        .bind(name.trim())
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }
}

/// Generates a new category ID (UUID v4).
pub fn generate_category_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::Utc;

    fn build_category(name: &str) -> Category {
        Category {
            id: generate_category_id(),
            name: name.to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_list_sorted() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        db.categories()
            .insert(&build_category("Drinks"))
            .await
            .unwrap();
        db.categories()
            .insert(&build_category("Bakery"))
            .await
            .unwrap();

        let all = db.categories().list().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "Bakery");
        assert_eq!(all[1].name, "Drinks");
    }

    #[tokio::test]
    async fn test_duplicate_name_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        db.categories()
            .insert(&build_category("Drinks"))
            .await
            .unwrap();
        let err = db
            .categories()
            .insert(&build_category("Drinks"))
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_empty_name_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let err = db
            .categories()
            .insert(&build_category("   "))
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::Core(_)));
    }

    #[tokio::test]
    async fn test_get_by_name() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.categories()
            .insert(&build_category("Drinks"))
            .await
            .unwrap();

        let found = db.categories().get_by_name("Drinks").await.unwrap();
        assert!(found.is_some());

        let found = db.categories().get_by_name(" Drinks ").await.unwrap();
        assert!(found.is_some());

        let missing = db.categories().get_by_name("Snacks").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_padded_name_stored_trimmed() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let stored = db
            .categories()
            .insert(&build_category("  Drinks "))
            .await
            .unwrap();
        assert_eq!(stored.name, "Drinks");

        // Exact-name lookup sees the clean form
        let found = db
            .categories()
            .get_by_name("Drinks")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, stored.id);

        // The trimmed twin is a duplicate
        let err = db
            .categories()
            .insert(&build_category("Drinks"))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }
}
