//! # Order Service
//!
//! Order creation, role-scoped reads, and the status transitions.
//!
//! ## Anatomy of a Transition
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  confirm / complete / cancel                                            │
//! │                                                                         │
//! │  1. resolve(user_id)            → Actor (identity + role)              │
//! │  2. load order within scope     → invisible order is NotFound          │
//! │  3. action.authorizes(..)       → wrong actor is Forbidden             │
//! │  4. action.permits(status)      → illegal edge is InvalidTransition    │
//! │  5. CAS UPDATE on prior status  → lost race is InvalidTransition       │
//! │                                                                         │
//! │  The order matters: an unauthorized caller learns nothing about the    │
//! │  order's current status, and a legal-looking transition that raced     │
//! │  a concurrent one never silently overwrites it.                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use tracing::{info, warn};

use crate::dto::{CreateOrderRequest, OrderResponse};
use crate::error::ApiError;
use crate::identity::IdentityResolver;
use mesa_core::{Actor, CoreError, Order, OrderAction, Restaurant, Role};
use mesa_db::{Database, OrderRepository, RestaurantRepository};

/// Service for order operations.
#[derive(Debug, Clone)]
pub struct OrderService {
    orders: OrderRepository,
    restaurants: RestaurantRepository,
    identity: IdentityResolver,
}

impl OrderService {
    /// Creates a new OrderService.
    pub fn new(db: &Database, identity: IdentityResolver) -> Self {
        OrderService {
            orders: db.orders(),
            restaurants: db.restaurants(),
            identity,
        }
    }

    // =========================================================================
    // Creation
    // =========================================================================

    /// Creates an order for the calling principal.
    ///
    /// Any authenticated principal may place an order; role only matters
    /// for visibility and transitions later.
    ///
    /// The whole operation is atomic: an invalid line (unknown item, or an
    /// item of another restaurant) leaves nothing behind.
    pub async fn create_order(
        &self,
        user_id: &str,
        request: CreateOrderRequest,
    ) -> Result<OrderResponse, ApiError> {
        let actor = self.identity.resolve(user_id).await?;

        let lines = request.normalized_lines().map_err(ApiError::from)?;

        let restaurant = self
            .restaurants
            .get_by_id(&request.restaurant_id)
            .await?
            .ok_or_else(|| CoreError::RestaurantNotFound(request.restaurant_id.clone()))?;

        let created = self
            .orders
            .create(&actor.user_id, &restaurant.id, &lines, request.notes)
            .await?;

        info!(
            order_id = %created.order.id,
            customer_id = %actor.user_id,
            restaurant_id = %restaurant.id,
            total = %created.order.total(),
            lines = created.lines.len(),
            "Order created"
        );

        Ok(OrderResponse::from_parts(
            created.order,
            created.lines,
            &restaurant,
        ))
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Lists orders visible to the principal.
    ///
    /// Admin sees everything; a restaurant owner sees orders against their
    /// restaurants; a customer sees orders they placed.
    pub async fn list_orders(&self, user_id: &str) -> Result<Vec<OrderResponse>, ApiError> {
        let actor = self.identity.resolve(user_id).await?;

        let orders = match actor.role {
            Role::Admin => self.orders.list_all().await?,
            Role::RestaurantOwner => self.orders.list_by_restaurant_owner(&actor.user_id).await?,
            Role::Customer => self.orders.list_by_customer(&actor.user_id).await?,
        };

        // Restaurants repeat across orders; fetch each once.
        let mut restaurants: HashMap<String, Restaurant> = HashMap::new();
        let mut responses = Vec::with_capacity(orders.len());

        for order in orders {
            if !restaurants.contains_key(&order.restaurant_id) {
                let restaurant = self
                    .restaurants
                    .get_by_id(&order.restaurant_id)
                    .await?
                    .ok_or_else(|| CoreError::RestaurantNotFound(order.restaurant_id.clone()))?;
                restaurants.insert(order.restaurant_id.clone(), restaurant);
            }
            let restaurant = &restaurants[&order.restaurant_id];

            let lines = self.orders.get_lines(&order.id).await?;
            responses.push(OrderResponse::from_parts(order, lines, restaurant));
        }

        Ok(responses)
    }

    /// Gets one order, scoped to the principal's visibility.
    ///
    /// An order outside the caller's scope reports NotFound, not Forbidden:
    /// invisible resources do not leak their existence.
    pub async fn get_order(&self, user_id: &str, order_id: &str) -> Result<OrderResponse, ApiError> {
        let actor = self.identity.resolve(user_id).await?;
        let (order, restaurant) = self.load_visible(&actor, order_id).await?;

        let lines = self.orders.get_lines(&order.id).await?;
        Ok(OrderResponse::from_parts(order, lines, &restaurant))
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Confirms a pending order. Restaurant owner or Admin only.
    pub async fn confirm_order(
        &self,
        user_id: &str,
        order_id: &str,
    ) -> Result<OrderResponse, ApiError> {
        self.apply_transition(user_id, order_id, OrderAction::Confirm)
            .await
    }

    /// Completes a confirmed order. Restaurant owner or Admin only.
    pub async fn complete_order(
        &self,
        user_id: &str,
        order_id: &str,
    ) -> Result<OrderResponse, ApiError> {
        self.apply_transition(user_id, order_id, OrderAction::Complete)
            .await
    }

    /// Cancels a pending or confirmed order. The order's customer, the
    /// restaurant owner, or an Admin.
    pub async fn cancel_order(
        &self,
        user_id: &str,
        order_id: &str,
    ) -> Result<OrderResponse, ApiError> {
        self.apply_transition(user_id, order_id, OrderAction::Cancel)
            .await
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Loads an order plus its restaurant, enforcing visibility.
    ///
    /// Visibility here is ownership-based: the customer who placed the
    /// order, the restaurant's owner, and Admins. That keeps an owner who
    /// ordered food elsewhere able to read (and cancel) their own order.
    async fn load_visible(
        &self,
        actor: &Actor,
        order_id: &str,
    ) -> Result<(Order, Restaurant), ApiError> {
        let order = self
            .orders
            .get_by_id(order_id)
            .await?
            .ok_or_else(|| CoreError::OrderNotFound(order_id.to_string()))?;

        let restaurant = self
            .restaurants
            .get_by_id(&order.restaurant_id)
            .await?
            .ok_or_else(|| CoreError::RestaurantNotFound(order.restaurant_id.clone()))?;

        let visible = actor.is_admin()
            || actor.user_id == order.customer_id
            || actor.user_id == restaurant.owner_id;

        if !visible {
            return Err(CoreError::OrderNotFound(order_id.to_string()).into());
        }

        Ok((order, restaurant))
    }

    async fn apply_transition(
        &self,
        user_id: &str,
        order_id: &str,
        action: OrderAction,
    ) -> Result<OrderResponse, ApiError> {
        let actor = self.identity.resolve(user_id).await?;
        let (order, restaurant) = self.load_visible(&actor, order_id).await?;

        if !action.authorizes(&actor, &order.customer_id, &restaurant.owner_id) {
            warn!(
                user_id = %user_id,
                order_id = %order_id,
                action = action.verb(),
                "Transition denied"
            );
            return Err(CoreError::Forbidden(denied_message(action)).into());
        }

        if !action.permits(order.status) {
            return Err(CoreError::InvalidTransition {
                order_id: order.id,
                current: order.status,
                action: action.verb(),
            }
            .into());
        }

        let updated = self
            .orders
            .set_status(&order.id, order.status, action.target())
            .await?;

        if !updated {
            // A concurrent transition moved the order first; report against
            // whatever status it has now.
            let current = self
                .orders
                .get_by_id(&order.id)
                .await?
                .map(|o| o.status)
                .unwrap_or(order.status);
            return Err(CoreError::InvalidTransition {
                order_id: order.id,
                current,
                action: action.verb(),
            }
            .into());
        }

        info!(
            order_id = %order.id,
            action = action.verb(),
            by = %actor.user_id,
            "Order transitioned"
        );

        let order = self
            .orders
            .get_by_id(&order.id)
            .await?
            .ok_or_else(|| CoreError::OrderNotFound(order_id.to_string()))?;
        let lines = self.orders.get_lines(&order.id).await?;

        Ok(OrderResponse::from_parts(order, lines, &restaurant))
    }
}

/// Human-readable denial per action.
fn denied_message(action: OrderAction) -> String {
    match action {
        OrderAction::Confirm => "You can only confirm orders for your own restaurant".to_string(),
        OrderAction::Complete => {
            "Only the restaurant owner or an admin can complete orders".to_string()
        }
        OrderAction::Cancel => "You don't have permission to cancel this order".to_string(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use mesa_core::{MenuItem, OrderStatus};
    use mesa_db::repository::profile::new_profile;
    use mesa_db::DbConfig;
    use std::collections::BTreeMap;

    use chrono::Utc;
    use uuid::Uuid;

    struct Fixture {
        db: Database,
        service: OrderService,
        restaurant: Restaurant,
        other_restaurant: Restaurant,
        dish_a: MenuItem,
        dish_b: MenuItem,
        foreign_dish: MenuItem,
    }

    async fn seed_restaurant(db: &Database, owner_id: &str, name: &str) -> Restaurant {
        let now = Utc::now();
        let restaurant = Restaurant {
            id: Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            name: name.to_string(),
            description: String::new(),
            address: "123 Test St".to_string(),
            phone: "1234567890".to_string(),
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        db.restaurants().insert(&restaurant).await.unwrap();
        restaurant
    }

    async fn seed_item(db: &Database, restaurant_id: &str, name: &str, price_cents: i64) -> MenuItem {
        let now = Utc::now();
        let item = MenuItem {
            id: Uuid::new_v4().to_string(),
            restaurant_id: restaurant_id.to_string(),
            name: name.to_string(),
            description: String::new(),
            price_cents,
            is_available: true,
            created_at: now,
            updated_at: now,
        };
        db.menu_items().insert(&item).await.unwrap();
        item
    }

    async fn setup() -> Fixture {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        for (user, role) in [
            ("admin-1", Role::Admin),
            ("owner-1", Role::RestaurantOwner),
            ("owner-2", Role::RestaurantOwner),
            ("cust-1", Role::Customer),
            ("cust-2", Role::Customer),
        ] {
            db.profiles().insert(&new_profile(user, role)).await.unwrap();
        }

        let restaurant = seed_restaurant(&db, "owner-1", "Trattoria Rosa").await;
        let other_restaurant = seed_restaurant(&db, "owner-2", "Seoul Kitchen").await;
        let dish_a = seed_item(&db, &restaurant.id, "Dish A", 500).await;
        let dish_b = seed_item(&db, &restaurant.id, "Dish B", 350).await;
        let foreign_dish = seed_item(&db, &other_restaurant.id, "Foreign Dish", 350).await;

        let service = OrderService::new(&db, IdentityResolver::new(&db));

        Fixture {
            db,
            service,
            restaurant,
            other_restaurant,
            dish_a,
            dish_b,
            foreign_dish,
        }
    }

    fn entry(id: &str, qty: i64) -> BTreeMap<String, i64> {
        let mut map = BTreeMap::new();
        map.insert(id.to_string(), qty);
        map
    }

    fn order_request(restaurant_id: &str, items: Vec<BTreeMap<String, i64>>) -> CreateOrderRequest {
        CreateOrderRequest {
            restaurant_id: restaurant_id.to_string(),
            items,
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_create_order_computes_total() {
        let f = setup().await;

        // A=$5.00 × 2, B=$3.50 × 1 → $13.50, two lines, Pending
        let response = f
            .service
            .create_order(
                "cust-1",
                order_request(
                    &f.restaurant.id,
                    vec![entry(&f.dish_a.id, 2), entry(&f.dish_b.id, 1)],
                ),
            )
            .await
            .unwrap();

        assert_eq!(response.status, OrderStatus::Pending);
        assert_eq!(response.total_cents, 1350);
        assert_eq!(response.items.len(), 2);
        assert_eq!(response.restaurant.name, "Trattoria Rosa");
        assert_eq!(response.items[0].name, "Dish A");
        assert_eq!(response.items[0].unit_price_cents, 500);
        assert_eq!(response.items[0].line_total_cents, 1000);
        assert_eq!(response.items[1].name, "Dish B");
        assert_eq!(response.items[1].line_total_cents, 350);
    }

    #[tokio::test]
    async fn test_create_order_with_foreign_item_persists_nothing() {
        let f = setup().await;

        let err = f
            .service
            .create_order(
                "cust-1",
                order_request(
                    &f.restaurant.id,
                    vec![entry(&f.dish_a.id, 2), entry(&f.foreign_dish.id, 1)],
                ),
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        assert_eq!(f.db.orders().count().await.unwrap(), 0);
        assert_eq!(f.db.orders().count_lines().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_create_order_unknown_restaurant() {
        let f = setup().await;

        let err = f
            .service
            .create_order(
                "cust-1",
                order_request("no-such-restaurant", vec![entry(&f.dish_a.id, 1)]),
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_listing_is_role_scoped() {
        let f = setup().await;

        f.service
            .create_order(
                "cust-1",
                order_request(&f.restaurant.id, vec![entry(&f.dish_a.id, 1)]),
            )
            .await
            .unwrap();
        f.service
            .create_order(
                "cust-2",
                order_request(&f.other_restaurant.id, vec![entry(&f.foreign_dish.id, 1)]),
            )
            .await
            .unwrap();

        // Customers see only their own
        let cust1 = f.service.list_orders("cust-1").await.unwrap();
        assert_eq!(cust1.len(), 1);
        assert_eq!(cust1[0].customer_id, "cust-1");

        // Owners see only their restaurant's
        let owner2 = f.service.list_orders("owner-2").await.unwrap();
        assert_eq!(owner2.len(), 1);
        assert_eq!(owner2[0].restaurant.id, f.other_restaurant.id);

        // Admin sees all
        let admin = f.service.list_orders("admin-1").await.unwrap();
        assert_eq!(admin.len(), 2);
    }

    #[tokio::test]
    async fn test_get_order_scoping() {
        let f = setup().await;

        let order = f
            .service
            .create_order(
                "cust-1",
                order_request(&f.restaurant.id, vec![entry(&f.dish_a.id, 1)]),
            )
            .await
            .unwrap();

        // The customer, the owner, and the admin can read it
        assert!(f.service.get_order("cust-1", &order.id).await.is_ok());
        assert!(f.service.get_order("owner-1", &order.id).await.is_ok());
        assert!(f.service.get_order("admin-1", &order.id).await.is_ok());

        // An unrelated customer gets NotFound, not Forbidden
        let err = f.service.get_order("cust-2", &order.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        // So does the owner of a different restaurant
        let err = f.service.get_order("owner-2", &order.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_confirm_authorization() {
        let f = setup().await;

        let order = f
            .service
            .create_order(
                "cust-1",
                order_request(&f.restaurant.id, vec![entry(&f.dish_a.id, 1)]),
            )
            .await
            .unwrap();

        // The order's own customer may not confirm: Forbidden (they can see
        // the order, so this is not a NotFound case)
        let err = f.service.confirm_order("cust-1", &order.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);

        // The owner confirms
        let confirmed = f.service.confirm_order("owner-1", &order.id).await.unwrap();
        assert_eq!(confirmed.status, OrderStatus::Confirmed);
    }

    #[tokio::test]
    async fn test_admin_can_drive_the_whole_lifecycle() {
        let f = setup().await;

        let order = f
            .service
            .create_order(
                "cust-1",
                order_request(&f.restaurant.id, vec![entry(&f.dish_a.id, 1)]),
            )
            .await
            .unwrap();

        let confirmed = f.service.confirm_order("admin-1", &order.id).await.unwrap();
        assert_eq!(confirmed.status, OrderStatus::Confirmed);
        let completed = f.service.complete_order("admin-1", &order.id).await.unwrap();
        assert_eq!(completed.status, OrderStatus::Completed);
    }

    #[tokio::test]
    async fn test_complete_requires_confirmed() {
        let f = setup().await;

        let order = f
            .service
            .create_order(
                "cust-1",
                order_request(&f.restaurant.id, vec![entry(&f.dish_a.id, 1)]),
            )
            .await
            .unwrap();

        // Straight from Pending: rejected
        let err = f
            .service
            .complete_order("owner-1", &order.id)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidTransition);
    }

    #[tokio::test]
    async fn test_cancel_paths() {
        let f = setup().await;

        // Customer cancels own pending order
        let order = f
            .service
            .create_order(
                "cust-1",
                order_request(&f.restaurant.id, vec![entry(&f.dish_a.id, 1)]),
            )
            .await
            .unwrap();
        let cancelled = f.service.cancel_order("cust-1", &order.id).await.unwrap();
        assert_eq!(cancelled.status, OrderStatus::Cancelled);

        // Owner cancels a confirmed order
        let order = f
            .service
            .create_order(
                "cust-1",
                order_request(&f.restaurant.id, vec![entry(&f.dish_b.id, 1)]),
            )
            .await
            .unwrap();
        f.service.confirm_order("owner-1", &order.id).await.unwrap();
        let cancelled = f.service.cancel_order("owner-1", &order.id).await.unwrap();
        assert_eq!(cancelled.status, OrderStatus::Cancelled);

        // Cancelled is terminal: a second cancel is rejected
        let err = f.service.cancel_order("cust-1", &order.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidTransition);
    }

    #[tokio::test]
    async fn test_terminal_states_reject_everything() {
        let f = setup().await;

        let order = f
            .service
            .create_order(
                "cust-1",
                order_request(&f.restaurant.id, vec![entry(&f.dish_a.id, 1)]),
            )
            .await
            .unwrap();

        f.service.confirm_order("owner-1", &order.id).await.unwrap();
        let completed = f.service.complete_order("owner-1", &order.id).await.unwrap();
        assert_eq!(completed.status, OrderStatus::Completed);

        // Completed is terminal for every action, even for the admin
        for (user, result) in [
            ("owner-1", f.service.confirm_order("owner-1", &order.id).await),
            ("owner-1", f.service.complete_order("owner-1", &order.id).await),
            ("cust-1", f.service.cancel_order("cust-1", &order.id).await),
            ("admin-1", f.service.cancel_order("admin-1", &order.id).await),
        ] {
            let err = result.unwrap_err();
            assert_eq!(err.code, ErrorCode::InvalidTransition, "actor: {user}");
        }

        let stored = f.db.orders().get_by_id(&order.id).await.unwrap().unwrap();
        assert_eq!(stored.status, OrderStatus::Completed);
    }

    #[tokio::test]
    async fn test_owner_as_customer_can_cancel_own_order() {
        let f = setup().await;

        // owner-2 orders from owner-1's restaurant
        let order = f
            .service
            .create_order(
                "owner-2",
                order_request(&f.restaurant.id, vec![entry(&f.dish_a.id, 1)]),
            )
            .await
            .unwrap();

        // They may cancel it (as its customer)...
        let err = f.service.confirm_order("owner-2", &order.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
        let cancelled = f.service.cancel_order("owner-2", &order.id).await.unwrap();
        assert_eq!(cancelled.status, OrderStatus::Cancelled);
    }
}
