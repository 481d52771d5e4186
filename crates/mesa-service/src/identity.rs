//! # Identity Resolver
//!
//! Maps an authenticated principal to its role.
//!
//! Authentication itself (tokens, sessions) happens outside this system;
//! by the time a call reaches a service, the transport has established a
//! stable `user_id`. This module answers the only question the core needs:
//! *which role does this identity act under right now?*
//!
//! ## Auto-Provisioning
//! A user authenticated by the external identity provider may not yet have
//! a profile row here (first request ever, or a profile wiped by support).
//! Rather than failing every such request, `resolve` creates a default
//! Customer profile on first sight. The underlying get-or-create is
//! race-safe - see [`mesa_db::ProfileRepository::get_or_create`].
//!
//! Bulk-import and fixture-loading paths construct the resolver with
//! auto-provisioning off, so an unknown identity surfaces as NotFound
//! instead of silently materializing a profile. This is an explicit
//! constructor flag, not ambient process state: two resolvers with
//! different settings can coexist in one process without leaking into
//! each other's requests.

use tracing::debug;

use crate::error::ApiError;
use mesa_core::{Actor, CoreError};
use mesa_db::{Database, ProfileRepository};

/// Resolves principals to [`Actor`]s (identity + role).
#[derive(Debug, Clone)]
pub struct IdentityResolver {
    profiles: ProfileRepository,
    auto_provision: bool,
}

impl IdentityResolver {
    /// Creates a resolver that auto-provisions missing profiles.
    ///
    /// This is the configuration every request-serving path uses.
    pub fn new(db: &Database) -> Self {
        IdentityResolver {
            profiles: db.profiles(),
            auto_provision: true,
        }
    }

    /// Creates a resolver that treats missing profiles as NotFound.
    ///
    /// For bulk imports and fixture loads, where an unknown identity is a
    /// data error rather than a first-time visitor.
    pub fn without_auto_provision(db: &Database) -> Self {
        IdentityResolver {
            profiles: db.profiles(),
            auto_provision: false,
        }
    }

    /// Resolves a principal to its actor (identity + role).
    pub async fn resolve(&self, user_id: &str) -> Result<Actor, ApiError> {
        let profile = if self.auto_provision {
            self.profiles.get_or_create(user_id).await?
        } else {
            self.profiles
                .get_by_user(user_id)
                .await?
                .ok_or_else(|| CoreError::ProfileNotFound(user_id.to_string()))?
        };

        debug!(user_id = %user_id, role = ?profile.role, "Resolved principal");

        Ok(Actor::new(profile.user_id, profile.role))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use mesa_core::Role;
    use mesa_db::repository::profile::new_profile;
    use mesa_db::DbConfig;

    #[tokio::test]
    async fn test_unknown_user_becomes_customer() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let resolver = IdentityResolver::new(&db);

        let actor = resolver.resolve("fresh-user").await.unwrap();
        assert_eq!(actor.user_id, "fresh-user");
        assert_eq!(actor.role, Role::Customer);

        // The profile is now durable
        let profile = db.profiles().get_by_user("fresh-user").await.unwrap();
        assert!(profile.is_some());
    }

    #[tokio::test]
    async fn test_existing_role_is_respected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.profiles()
            .insert(&new_profile("owner-1", Role::RestaurantOwner))
            .await
            .unwrap();

        let resolver = IdentityResolver::new(&db);
        let actor = resolver.resolve("owner-1").await.unwrap();
        assert_eq!(actor.role, Role::RestaurantOwner);
    }

    #[tokio::test]
    async fn test_skip_auto_provision_reports_not_found() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let resolver = IdentityResolver::without_auto_provision(&db);

        let err = resolver.resolve("fresh-user").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        // And nothing was created behind the scenes
        let profile = db.profiles().get_by_user("fresh-user").await.unwrap();
        assert!(profile.is_none());
    }

    #[tokio::test]
    async fn test_resolvers_do_not_leak_settings() {
        // Both modes against the same database, interleaved
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let provisioning = IdentityResolver::new(&db);
        let strict = IdentityResolver::without_auto_provision(&db);

        assert!(strict.resolve("user-a").await.is_err());
        assert!(provisioning.resolve("user-a").await.is_ok());
        // Now the profile exists, strict mode sees it too
        assert!(strict.resolve("user-a").await.is_ok());
        // ...and a different unknown user still fails in strict mode
        assert!(strict.resolve("user-b").await.is_err());
    }
}
