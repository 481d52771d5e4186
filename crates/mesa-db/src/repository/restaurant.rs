//! # Restaurant Repository
//!
//! Database operations for restaurants.
//!
//! Visibility is decided in mesa-service; this module only provides the
//! query shapes the visibility filter needs (all-active vs. by-owner).

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use mesa_core::Restaurant;

const RESTAURANT_COLUMNS: &str =
    "id, owner_id, name, description, address, phone, is_active, created_at, updated_at";

/// Repository for restaurant database operations.
#[derive(Debug, Clone)]
pub struct RestaurantRepository {
    pool: SqlitePool,
}

impl RestaurantRepository {
    /// Creates a new RestaurantRepository.
    pub fn new(pool: SqlitePool) -> Self {
        RestaurantRepository { pool }
    }

    /// Gets a restaurant by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Restaurant>> {
        let restaurant = sqlx::query_as::<_, Restaurant>(&format!(
            "SELECT {RESTAURANT_COLUMNS} FROM restaurants WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(restaurant)
    }

    /// Lists active restaurants, newest first.
    ///
    /// This is what customers and admins browse; deactivated restaurants
    /// stay visible only to their owner.
    pub async fn list_active(&self) -> DbResult<Vec<Restaurant>> {
        let restaurants = sqlx::query_as::<_, Restaurant>(&format!(
            r#"
            SELECT {RESTAURANT_COLUMNS}
            FROM restaurants
            WHERE is_active = 1
            ORDER BY created_at DESC
            "#
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(restaurants)
    }

    /// Lists all restaurants owned by a principal, including inactive ones.
    pub async fn list_by_owner(&self, owner_id: &str) -> DbResult<Vec<Restaurant>> {
        let restaurants = sqlx::query_as::<_, Restaurant>(&format!(
            r#"
            SELECT {RESTAURANT_COLUMNS}
            FROM restaurants
            WHERE owner_id = ?1
            ORDER BY created_at DESC
            "#
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(restaurants)
    }

    /// Inserts a new restaurant.
    pub async fn insert(&self, restaurant: &Restaurant) -> DbResult<()> {
        debug!(id = %restaurant.id, name = %restaurant.name, "Inserting restaurant");

        sqlx::query(
            r#"
            INSERT INTO restaurants (
                id, owner_id, name, description, address, phone,
                is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&restaurant.id)
        .bind(&restaurant.owner_id)
        .bind(&restaurant.name)
        .bind(&restaurant.description)
        .bind(&restaurant.address)
        .bind(&restaurant.phone)
        .bind(restaurant.is_active)
        .bind(restaurant.created_at)
        .bind(restaurant.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Updates an existing restaurant.
    ///
    /// The owner never changes here; ownership transfer is not a thing
    /// this platform does.
    pub async fn update(&self, restaurant: &Restaurant) -> DbResult<()> {
        debug!(id = %restaurant.id, "Updating restaurant");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE restaurants SET
                name = ?2,
                description = ?3,
                address = ?4,
                phone = ?5,
                is_active = ?6,
                updated_at = ?7
            WHERE id = ?1
            "#,
        )
        .bind(&restaurant.id)
        .bind(&restaurant.name)
        .bind(&restaurant.description)
        .bind(&restaurant.address)
        .bind(&restaurant.phone)
        .bind(restaurant.is_active)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Restaurant", &restaurant.id));
        }

        Ok(())
    }
}

/// Helper to generate a new restaurant ID.
pub fn generate_restaurant_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================
