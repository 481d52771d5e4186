//! # Menu Item Repository
//!
//! Database operations for menu items.
//!
//! ## Scoped Lookup
//! `get_in_restaurant` is the lookup the order subsystem uses: the item id
//! AND the restaurant id must both match. An item id that exists under a
//! different restaurant reports None, exactly like an id that does not
//! exist at all - order lines can never cross restaurants.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use mesa_core::MenuItem;

const MENU_ITEM_COLUMNS: &str =
    "id, restaurant_id, name, description, price_cents, is_available, created_at, updated_at";

/// Repository for menu item database operations.
#[derive(Debug, Clone)]
pub struct MenuItemRepository {
    pool: SqlitePool,
}

impl MenuItemRepository {
    /// Creates a new MenuItemRepository.
    pub fn new(pool: SqlitePool) -> Self {
        MenuItemRepository { pool }
    }

    /// Gets a menu item by its ID, unscoped.
    ///
    /// Used by mutation paths that need the item first to find out which
    /// restaurant (and therefore which owner) it belongs to.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<MenuItem>> {
        let item = sqlx::query_as::<_, MenuItem>(&format!(
            "SELECT {MENU_ITEM_COLUMNS} FROM menu_items WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// Gets a menu item scoped to a restaurant.
    ///
    /// Returns None when the id exists but under another restaurant.
    pub async fn get_in_restaurant(
        &self,
        id: &str,
        restaurant_id: &str,
    ) -> DbResult<Option<MenuItem>> {
        let item = sqlx::query_as::<_, MenuItem>(&format!(
            "SELECT {MENU_ITEM_COLUMNS} FROM menu_items WHERE id = ?1 AND restaurant_id = ?2"
        ))
        .bind(id)
        .bind(restaurant_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// Lists available items, newest first.
    pub async fn list_available(&self) -> DbResult<Vec<MenuItem>> {
        let items = sqlx::query_as::<_, MenuItem>(&format!(
            r#"
            SELECT {MENU_ITEM_COLUMNS}
            FROM menu_items
            WHERE is_available = 1
            ORDER BY created_at DESC
            "#
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Lists available items of one restaurant, newest first.
    pub async fn list_available_in_restaurant(
        &self,
        restaurant_id: &str,
    ) -> DbResult<Vec<MenuItem>> {
        let items = sqlx::query_as::<_, MenuItem>(&format!(
            r#"
            SELECT {MENU_ITEM_COLUMNS}
            FROM menu_items
            WHERE restaurant_id = ?1 AND is_available = 1
            ORDER BY created_at DESC
            "#
        ))
        .bind(restaurant_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Lists every item of every restaurant a principal owns, including
    /// unavailable ones. This is the owner's management view.
    pub async fn list_by_owner(&self, owner_id: &str) -> DbResult<Vec<MenuItem>> {
        let items = sqlx::query_as::<_, MenuItem>(&format!(
            r#"
            SELECT m.id, m.restaurant_id, m.name, m.description, m.price_cents,
                   m.is_available, m.created_at, m.updated_at
            FROM menu_items m
            INNER JOIN restaurants r ON r.id = m.restaurant_id
            WHERE r.owner_id = ?1
            ORDER BY m.created_at DESC
            "#
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Inserts a new menu item.
    pub async fn insert(&self, item: &MenuItem) -> DbResult<()> {
        debug!(id = %item.id, restaurant_id = %item.restaurant_id, "Inserting menu item");

        sqlx::query(
            r#"
            INSERT INTO menu_items (
                id, restaurant_id, name, description, price_cents,
                is_available, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&item.id)
        .bind(&item.restaurant_id)
        .bind(&item.name)
        .bind(&item.description)
        .bind(item.price_cents)
        .bind(item.is_available)
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Updates an existing menu item.
    ///
    /// Changing the price here never touches order lines: they carry their
    /// own frozen copy.
    pub async fn update(&self, item: &MenuItem) -> DbResult<()> {
        debug!(id = %item.id, "Updating menu item");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE menu_items SET
                name = ?2,
                description = ?3,
                price_cents = ?4,
                is_available = ?5,
                updated_at = ?6
            WHERE id = ?1
            "#,
        )
        .bind(&item.id)
        .bind(&item.name)
        .bind(&item.description)
        .bind(item.price_cents)
        .bind(item.is_available)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("MenuItem", &item.id));
        }

        Ok(())
    }
}

/// Helper to generate a new menu item ID.
pub fn generate_menu_item_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::restaurant::generate_restaurant_id;
    use mesa_core::Restaurant;

    async fn seed_restaurant(db: &Database, owner_id: &str) -> Restaurant {
        let now = Utc::now();
        let r = Restaurant {
            id: generate_restaurant_id(),
            owner_id: owner_id.to_string(),
            name: "Test Restaurant".to_string(),
            description: String::new(),
            address: "123 Test St".to_string(),
            phone: "1234567890".to_string(),
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        db.restaurants().insert(&r).await.unwrap();
        r
    }

    fn item(restaurant_id: &str, name: &str, price_cents: i64, available: bool) -> MenuItem {
        let now = Utc::now();
        MenuItem {
            id: generate_menu_item_id(),
            restaurant_id: restaurant_id.to_string(),
            name: name.to_string(),
            description: "A delicious test dish".to_string(),
            price_cents,
            is_available: available,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_scoped_lookup_misses_other_restaurant() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let r1 = seed_restaurant(&db, "owner-1").await;
        let r2 = seed_restaurant(&db, "owner-2").await;

        let dish = item(&r1.id, "Margherita", 500, true);
        db.menu_items().insert(&dish).await.unwrap();

        // Scoped to the right restaurant: hit
        let found = db
            .menu_items()
            .get_in_restaurant(&dish.id, &r1.id)
            .await
            .unwrap();
        assert!(found.is_some());

        // Scoped to another restaurant: miss, even though the id exists
        let missed = db
            .menu_items()
            .get_in_restaurant(&dish.id, &r2.id)
            .await
            .unwrap();
        assert!(missed.is_none());
    }

    #[tokio::test]
    async fn test_list_available_filters() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let r = seed_restaurant(&db, "owner-1").await;

        db.menu_items()
            .insert(&item(&r.id, "On menu", 500, true))
            .await
            .unwrap();
        db.menu_items()
            .insert(&item(&r.id, "86'd", 350, false))
            .await
            .unwrap();

        let available = db
            .menu_items()
            .list_available_in_restaurant(&r.id)
            .await
            .unwrap();
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].name, "On menu");

        // Owner management view sees both
        let own = db.menu_items().list_by_owner("owner-1").await.unwrap();
        assert_eq!(own.len(), 2);
    }

    #[tokio::test]
    async fn test_insert_requires_existing_restaurant() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let orphan = item("no-such-restaurant", "Orphan", 100, true);
        let err = db.menu_items().insert(&orphan).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }
}
