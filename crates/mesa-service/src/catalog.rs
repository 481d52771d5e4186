//! # Catalog Service
//!
//! Role-scoped visibility and mutation authorization for restaurants and
//! menu items.
//!
//! ## Visibility Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  list_restaurants                                                       │
//! │    RestaurantOwner → own restaurants (including inactive)              │
//! │    Customer, Admin → active restaurants only                           │
//! │                                                                         │
//! │  list_menu_items                                                        │
//! │    RestaurantOwner → items of owned restaurants (incl. unavailable)    │
//! │    Customer, Admin → available items only                              │
//! │                                                                         │
//! │  Mutations (create/update under a restaurant)                          │
//! │    owning RestaurantOwner or Admin → allowed                           │
//! │    everyone else → Forbidden                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::dto::{
    CreateMenuItemRequest, CreateRestaurantRequest, UpdateMenuItemRequest,
    UpdateRestaurantRequest,
};
use crate::error::ApiError;
use crate::identity::IdentityResolver;
use mesa_core::validation::{validate_name, validate_price};
use mesa_core::{Actor, CoreError, MenuItem, Restaurant, Role, ValidationError};
use mesa_db::{Database, MenuItemRepository, RestaurantRepository};

/// Service for restaurant and menu item operations.
#[derive(Debug, Clone)]
pub struct CatalogService {
    restaurants: RestaurantRepository,
    menu_items: MenuItemRepository,
    identity: IdentityResolver,
}

/// Whether `actor` may mutate `restaurant` or anything under it.
fn can_manage(actor: &Actor, restaurant: &Restaurant) -> bool {
    actor.is_admin() || actor.user_id == restaurant.owner_id
}

impl CatalogService {
    /// Creates a new CatalogService.
    pub fn new(db: &Database, identity: IdentityResolver) -> Self {
        CatalogService {
            restaurants: db.restaurants(),
            menu_items: db.menu_items(),
            identity,
        }
    }

    // =========================================================================
    // Restaurants
    // =========================================================================

    /// Lists restaurants visible to the principal.
    pub async fn list_restaurants(&self, user_id: &str) -> Result<Vec<Restaurant>, ApiError> {
        let actor = self.identity.resolve(user_id).await?;

        let restaurants = match actor.role {
            Role::RestaurantOwner => self.restaurants.list_by_owner(&actor.user_id).await?,
            Role::Admin | Role::Customer => self.restaurants.list_active().await?,
        };

        Ok(restaurants)
    }

    /// Creates a restaurant owned by the caller.
    pub async fn create_restaurant(
        &self,
        user_id: &str,
        request: CreateRestaurantRequest,
    ) -> Result<Restaurant, ApiError> {
        let actor = self.identity.resolve(user_id).await?;

        match actor.role {
            Role::RestaurantOwner | Role::Admin => {}
            Role::Customer => {
                warn!(user_id = %user_id, "Customer attempted to create a restaurant");
                return Err(CoreError::Forbidden(
                    "Only restaurant owners can create restaurants".to_string(),
                )
                .into());
            }
        }

        validate_name(&request.name).map_err(CoreError::from)?;

        let now = Utc::now();
        let restaurant = Restaurant {
            id: Uuid::new_v4().to_string(),
            owner_id: actor.user_id,
            name: request.name,
            description: request.description,
            address: request.address,
            phone: request.phone,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        self.restaurants.insert(&restaurant).await?;

        info!(restaurant_id = %restaurant.id, owner_id = %restaurant.owner_id, "Restaurant created");

        Ok(restaurant)
    }

    /// Updates a restaurant. Owner or Admin only.
    pub async fn update_restaurant(
        &self,
        user_id: &str,
        restaurant_id: &str,
        request: UpdateRestaurantRequest,
    ) -> Result<Restaurant, ApiError> {
        let actor = self.identity.resolve(user_id).await?;

        let mut restaurant = self
            .restaurants
            .get_by_id(restaurant_id)
            .await?
            .ok_or_else(|| CoreError::RestaurantNotFound(restaurant_id.to_string()))?;

        if !can_manage(&actor, &restaurant) {
            warn!(user_id = %user_id, restaurant_id = %restaurant_id, "Restaurant update denied");
            return Err(CoreError::Forbidden(
                "You can only edit your own restaurants".to_string(),
            )
            .into());
        }

        if let Some(name) = request.name {
            validate_name(&name).map_err(CoreError::from)?;
            restaurant.name = name;
        }
        if let Some(description) = request.description {
            restaurant.description = description;
        }
        if let Some(address) = request.address {
            restaurant.address = address;
        }
        if let Some(phone) = request.phone {
            restaurant.phone = phone;
        }
        if let Some(is_active) = request.is_active {
            restaurant.is_active = is_active;
        }
        restaurant.updated_at = Utc::now();

        self.restaurants.update(&restaurant).await?;

        info!(restaurant_id = %restaurant.id, "Restaurant updated");

        Ok(restaurant)
    }

    // =========================================================================
    // Menu Items
    // =========================================================================

    /// Lists menu items visible to the principal.
    pub async fn list_menu_items(&self, user_id: &str) -> Result<Vec<MenuItem>, ApiError> {
        let actor = self.identity.resolve(user_id).await?;

        let items = match actor.role {
            Role::RestaurantOwner => self.menu_items.list_by_owner(&actor.user_id).await?,
            Role::Admin | Role::Customer => self.menu_items.list_available().await?,
        };

        Ok(items)
    }

    /// Lists the available items of one restaurant.
    ///
    /// The restaurant id is required: its absence is a caller error, not an
    /// empty filter. An unknown id yields an empty list.
    pub async fn menu_items_by_restaurant(
        &self,
        user_id: &str,
        restaurant_id: Option<&str>,
    ) -> Result<Vec<MenuItem>, ApiError> {
        self.identity.resolve(user_id).await?;

        let restaurant_id = restaurant_id.ok_or_else(|| {
            CoreError::from(ValidationError::Required {
                field: "restaurant_id".to_string(),
            })
        })?;

        let items = self
            .menu_items
            .list_available_in_restaurant(restaurant_id)
            .await?;

        Ok(items)
    }

    /// Creates a menu item under a restaurant. Owner or Admin only.
    pub async fn create_menu_item(
        &self,
        user_id: &str,
        request: CreateMenuItemRequest,
    ) -> Result<MenuItem, ApiError> {
        let actor = self.identity.resolve(user_id).await?;

        let restaurant = self
            .restaurants
            .get_by_id(&request.restaurant_id)
            .await?
            .ok_or_else(|| CoreError::RestaurantNotFound(request.restaurant_id.clone()))?;

        if !can_manage(&actor, &restaurant) {
            warn!(user_id = %user_id, restaurant_id = %restaurant.id, "Menu item creation denied");
            return Err(CoreError::Forbidden(
                "You can only add menu items to your own restaurants".to_string(),
            )
            .into());
        }

        validate_name(&request.name).map_err(CoreError::from)?;
        validate_price(request.price_cents).map_err(CoreError::from)?;

        let now = Utc::now();
        let item = MenuItem {
            id: Uuid::new_v4().to_string(),
            restaurant_id: restaurant.id,
            name: request.name,
            description: request.description,
            price_cents: request.price_cents,
            is_available: request.is_available,
            created_at: now,
            updated_at: now,
        };

        self.menu_items.insert(&item).await?;

        info!(item_id = %item.id, restaurant_id = %item.restaurant_id, "Menu item created");

        Ok(item)
    }

    /// Updates a menu item. Owner or Admin only.
    ///
    /// Price changes affect future orders only; existing order lines keep
    /// their snapshot.
    pub async fn update_menu_item(
        &self,
        user_id: &str,
        item_id: &str,
        request: UpdateMenuItemRequest,
    ) -> Result<MenuItem, ApiError> {
        let actor = self.identity.resolve(user_id).await?;

        let mut item = self
            .menu_items
            .get_by_id(item_id)
            .await?
            .ok_or_else(|| CoreError::MenuItemNotFound(item_id.to_string()))?;

        let restaurant = self
            .restaurants
            .get_by_id(&item.restaurant_id)
            .await?
            .ok_or_else(|| CoreError::RestaurantNotFound(item.restaurant_id.clone()))?;

        if !can_manage(&actor, &restaurant) {
            warn!(user_id = %user_id, item_id = %item_id, "Menu item update denied");
            return Err(CoreError::Forbidden(
                "You can only edit menu items of your own restaurants".to_string(),
            )
            .into());
        }

        if let Some(name) = request.name {
            validate_name(&name).map_err(CoreError::from)?;
            item.name = name;
        }
        if let Some(description) = request.description {
            item.description = description;
        }
        if let Some(price_cents) = request.price_cents {
            validate_price(price_cents).map_err(CoreError::from)?;
            item.price_cents = price_cents;
        }
        if let Some(is_available) = request.is_available {
            item.is_available = is_available;
        }
        item.updated_at = Utc::now();

        self.menu_items.update(&item).await?;

        info!(item_id = %item.id, "Menu item updated");

        Ok(item)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use mesa_db::repository::profile::new_profile;
    use mesa_db::DbConfig;

    async fn setup() -> (Database, CatalogService) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        for (user, role) in [
            ("admin-1", Role::Admin),
            ("owner-1", Role::RestaurantOwner),
            ("owner-2", Role::RestaurantOwner),
            ("cust-1", Role::Customer),
        ] {
            db.profiles().insert(&new_profile(user, role)).await.unwrap();
        }
        let service = CatalogService::new(&db, IdentityResolver::new(&db));
        (db, service)
    }

    fn restaurant_request(name: &str) -> CreateRestaurantRequest {
        CreateRestaurantRequest {
            name: name.to_string(),
            description: String::new(),
            address: "123 Test St".to_string(),
            phone: "1234567890".to_string(),
        }
    }

    fn item_request(restaurant_id: &str, name: &str, price_cents: i64) -> CreateMenuItemRequest {
        CreateMenuItemRequest {
            restaurant_id: restaurant_id.to_string(),
            name: name.to_string(),
            description: String::new(),
            price_cents,
            is_available: true,
        }
    }

    #[tokio::test]
    async fn test_customer_cannot_create_restaurant() {
        let (_db, service) = setup().await;

        let err = service
            .create_restaurant("cust-1", restaurant_request("Nope"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn test_owner_sees_inactive_customer_does_not() {
        let (_db, service) = setup().await;

        let restaurant = service
            .create_restaurant("owner-1", restaurant_request("Trattoria"))
            .await
            .unwrap();

        // Owner deactivates it
        service
            .update_restaurant(
                "owner-1",
                &restaurant.id,
                UpdateRestaurantRequest {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let owner_view = service.list_restaurants("owner-1").await.unwrap();
        assert_eq!(owner_view.len(), 1);

        let customer_view = service.list_restaurants("cust-1").await.unwrap();
        assert!(customer_view.is_empty());
    }

    #[tokio::test]
    async fn test_only_owner_or_admin_updates_restaurant() {
        let (_db, service) = setup().await;

        let restaurant = service
            .create_restaurant("owner-1", restaurant_request("Trattoria"))
            .await
            .unwrap();

        let rename = |name: &str| UpdateRestaurantRequest {
            name: Some(name.to_string()),
            ..Default::default()
        };

        // Another owner: denied
        let err = service
            .update_restaurant("owner-2", &restaurant.id, rename("Hijacked"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);

        // Admin: allowed
        let updated = service
            .update_restaurant("admin-1", &restaurant.id, rename("Renamed"))
            .await
            .unwrap();
        assert_eq!(updated.name, "Renamed");
    }

    #[tokio::test]
    async fn test_menu_item_mutations_are_owner_scoped() {
        let (_db, service) = setup().await;

        let restaurant = service
            .create_restaurant("owner-1", restaurant_request("Trattoria"))
            .await
            .unwrap();

        // Wrong owner cannot add
        let err = service
            .create_menu_item("owner-2", item_request(&restaurant.id, "Intruder", 100))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);

        // Owner adds, then another owner fails to edit
        let item = service
            .create_menu_item("owner-1", item_request(&restaurant.id, "Margherita", 500))
            .await
            .unwrap();

        let err = service
            .update_menu_item(
                "owner-2",
                &item.id,
                UpdateMenuItemRequest {
                    price_cents: Some(1),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn test_create_menu_item_under_missing_restaurant() {
        let (_db, service) = setup().await;

        let err = service
            .create_menu_item("owner-1", item_request("no-such-id", "Ghost", 100))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_negative_price_rejected() {
        let (_db, service) = setup().await;

        let restaurant = service
            .create_restaurant("owner-1", restaurant_request("Trattoria"))
            .await
            .unwrap();

        let err = service
            .create_menu_item("owner-1", item_request(&restaurant.id, "Freebie", -1))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_customer_sees_only_available_items() {
        let (_db, service) = setup().await;

        let restaurant = service
            .create_restaurant("owner-1", restaurant_request("Trattoria"))
            .await
            .unwrap();
        service
            .create_menu_item("owner-1", item_request(&restaurant.id, "On menu", 500))
            .await
            .unwrap();
        let off = service
            .create_menu_item("owner-1", item_request(&restaurant.id, "Off menu", 350))
            .await
            .unwrap();
        service
            .update_menu_item(
                "owner-1",
                &off.id,
                UpdateMenuItemRequest {
                    is_available: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let customer_view = service.list_menu_items("cust-1").await.unwrap();
        assert_eq!(customer_view.len(), 1);
        assert_eq!(customer_view[0].name, "On menu");

        let owner_view = service.list_menu_items("owner-1").await.unwrap();
        assert_eq!(owner_view.len(), 2);
    }

    #[tokio::test]
    async fn test_by_restaurant_requires_id() {
        let (_db, service) = setup().await;

        let err = service
            .menu_items_by_restaurant("cust-1", None)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        // With an id (even unknown) the call succeeds with an empty list
        let items = service
            .menu_items_by_restaurant("cust-1", Some("unknown"))
            .await
            .unwrap();
        assert!(items.is_empty());
    }
}
