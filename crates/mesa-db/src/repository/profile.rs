//! # Profile Repository
//!
//! Database operations for user profiles.
//!
//! ## Get-Or-Create
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │              Race-Safe Auto-Provisioning                                │
//! │                                                                         │
//! │  Two requests for the same brand-new user arrive at once:              │
//! │                                                                         │
//! │  Request A ──► INSERT .. ON CONFLICT(user_id) DO NOTHING ──► row made  │
//! │  Request B ──► INSERT .. ON CONFLICT(user_id) DO NOTHING ──► no-op     │
//! │  Both     ──► SELECT by user_id ──► the same single profile            │
//! │                                                                         │
//! │  A read-then-write version would create duplicates under this          │
//! │  interleaving; the UNIQUE constraint makes the operation idempotent.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use mesa_core::{Role, UserProfile};

/// Repository for user profile database operations.
#[derive(Debug, Clone)]
pub struct ProfileRepository {
    pool: SqlitePool,
}

impl ProfileRepository {
    /// Creates a new ProfileRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProfileRepository { pool }
    }

    /// Gets a profile by the external user id.
    pub async fn get_by_user(&self, user_id: &str) -> DbResult<Option<UserProfile>> {
        let profile = sqlx::query_as::<_, UserProfile>(
            r#"
            SELECT id, user_id, role, phone, created_at, updated_at
            FROM user_profiles
            WHERE user_id = ?1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    /// Gets the profile for `user_id`, creating a default-role one if absent.
    ///
    /// ## Concurrency
    /// Safe under concurrent first use of the same identity: the insert is
    /// `ON CONFLICT DO NOTHING` against the UNIQUE(user_id) constraint, and
    /// the follow-up select returns whichever insert won.
    pub async fn get_or_create(&self, user_id: &str) -> DbResult<UserProfile> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        debug!(user_id = %user_id, "Ensuring profile exists");

        sqlx::query(
            r#"
            INSERT INTO user_profiles (id, user_id, role, phone, created_at, updated_at)
            VALUES (?1, ?2, ?3, NULL, ?4, ?4)
            ON CONFLICT(user_id) DO NOTHING
            "#,
        )
        .bind(&id)
        .bind(user_id)
        .bind(Role::Customer)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.get_by_user(user_id)
            .await?
            .ok_or_else(|| DbError::not_found("UserProfile", user_id))
    }

    /// Inserts a profile with an explicit role.
    ///
    /// Used by account-management flows and the seed binary; the resolver
    /// itself only ever creates default-role profiles.
    pub async fn insert(&self, profile: &UserProfile) -> DbResult<()> {
        debug!(user_id = %profile.user_id, role = ?profile.role, "Inserting profile");

        sqlx::query(
            r#"
            INSERT INTO user_profiles (id, user_id, role, phone, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&profile.id)
        .bind(&profile.user_id)
        .bind(profile.role)
        .bind(&profile.phone)
        .bind(profile.created_at)
        .bind(profile.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

/// Helper to build a new profile for insertion.
pub fn new_profile(user_id: &str, role: Role) -> UserProfile {
    let now = Utc::now();
    UserProfile {
        id: Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        role,
        phone: None,
        created_at: now,
        updated_at: now,
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
    async fn test_get_or_create_provisions_customer() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let profile = db.profiles().get_or_create("user-1").await.unwrap();
        assert_eq!(profile.user_id, "user-1");
        assert_eq!(profile.role, Role::Customer);
    }

    #[tokio::test]
    async fn test_get_or_create_is_idempotent() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let first = db.profiles().get_or_create("user-1").await.unwrap();
        let second = db.profiles().get_or_create("user-1").await.unwrap();

        // Same row both times, not a duplicate
        assert_eq!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_get_or_create_keeps_existing_role() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let owner = new_profile("owner-1", Role::RestaurantOwner);
        db.profiles().insert(&owner).await.unwrap();

        // get_or_create must not downgrade an existing profile to Customer
        let resolved = db.profiles().get_or_create("owner-1").await.unwrap();
        assert_eq!(resolved.role, Role::RestaurantOwner);
    }

    #[tokio::test]
    async fn test_duplicate_insert_is_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let profile = new_profile("user-1", Role::Customer);
        db.profiles().insert(&profile).await.unwrap();

        let dup = new_profile("user-1", Role::Admin);
        let err = db.profiles().insert(&dup).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }
}
