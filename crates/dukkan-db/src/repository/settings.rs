//! # Settings Repository
//!
//! Persistence for the store profile: a single row holding the shop's
//! identity and display currency. `id` is constrained to 1 in the schema,
//! so `save` is an upsert and `get` never returns more than one profile.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use dukkan_core::{CoreError, StoreProfile, ValidationError};

/// Repository for the store profile row.
#[derive(Debug, Clone)]
pub struct SettingsRepository {
    pool: SqlitePool,
}

impl SettingsRepository {
    /// Creates a new SettingsRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SettingsRepository { pool }
    }

    /// Gets the store profile, if one was ever saved.
    ///
    /// A fresh database has no row; callers fall back to
    /// `StoreProfile::default()` for display.
    pub async fn get(&self) -> DbResult<Option<StoreProfile>> {
        let profile = sqlx::query_as::<_, StoreProfile>(
            r#"
            SELECT shop_name, contact, location, currency
            FROM store_profile
            WHERE id = 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    /// Saves the store profile (insert or overwrite the single row).
    pub async fn save(&self, profile: &StoreProfile) -> DbResult<()> {
        if profile.shop_name.trim().is_empty() {
            return Err(CoreError::from(ValidationError::Required {
                field: "shop_name".to_string(),
            })
            .into());
        }
        if profile.currency.trim().is_empty() {
            return Err(CoreError::from(ValidationError::Required {
                field: "currency".to_string(),
            })
            .into());
        }

        sqlx::query(
            r#"
            INSERT INTO store_profile (id, shop_name, contact, location, currency)
            VALUES (1, ?1, ?2, ?3, ?4)
            ON CONFLICT(id) DO UPDATE SET
                shop_name = excluded.shop_name,
                contact = excluded.contact,
                location = excluded.location,
                currency = excluded.currency
            "#,
        )
        .bind(profile.shop_name.trim())
        .bind(&profile.contact)
        .bind(&profile.location)
        .bind(profile.currency.trim())
        .execute(&self.pool)
        .await?;

        debug!(shop_name = %profile.shop_name, "Store profile saved");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn test_fresh_database_has_no_profile() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(db.settings().get().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_and_get() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let profile = StoreProfile {
            shop_name: "Corner Dukkan".to_string(),
            contact: Some("0550 12 34 56".to_string()),
            location: Some("Rue Didouche Mourad".to_string()),
            currency: "DA".to_string(),
        };
        db.settings().save(&profile).await.unwrap();

        let loaded = db.settings().get().await.unwrap().unwrap();
        assert_eq!(loaded.shop_name, "Corner Dukkan");
        assert_eq!(loaded.contact.as_deref(), Some("0550 12 34 56"));
        assert_eq!(loaded.currency, "DA");
    }

    #[tokio::test]
    async fn test_save_twice_overwrites_single_row() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        db.settings().save(&StoreProfile::default()).await.unwrap();

        let mut profile = StoreProfile::default();
        profile.shop_name = "Renamed Store".to_string();
        profile.currency = "€".to_string();
        db.settings().save(&profile).await.unwrap();

        let loaded = db.settings().get().await.unwrap().unwrap();
        assert_eq!(loaded.shop_name, "Renamed Store");
        assert_eq!(loaded.currency, "€");

        let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM store_profile")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[tokio::test]
    async fn test_save_rejects_blank_identity() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let mut profile = StoreProfile::default();
        profile.shop_name = "  ".to_string();
        assert!(db.settings().save(&profile).await.is_err());

        let mut profile = StoreProfile::default();
        profile.currency = String::new();
        assert!(db.settings().save(&profile).await.is_err());

        assert!(db.settings().get().await.unwrap().is_none());
    }
}
