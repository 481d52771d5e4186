//! # Domain Types
//!
//! Core domain types used throughout Mesa.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   Restaurant    │   │    MenuItem     │   │     Order       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  owner_id       │   │  restaurant_id  │   │  customer_id    │       │
//! │  │  is_active      │   │  price_cents    │   │  restaurant_id  │       │
//! │  └─────────────────┘   │  is_available   │   │  status         │       │
//! │                        └─────────────────┘   │  total_cents    │       │
//! │  ┌─────────────────┐   ┌─────────────────┐   └────────┬────────┘       │
//! │  │   UserProfile   │   │      Role       │            │ 1:N            │
//! │  │  ─────────────  │   │  ─────────────  │   ┌────────▼────────┐       │
//! │  │  user_id (UNIQ) │   │  Admin          │   │   OrderLine     │       │
//! │  │  role           │   │  RestaurantOwner│   │  price snapshot │       │
//! │  └─────────────────┘   │  Customer       │   │  quantity       │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! An `OrderLine` copies the menu item's name and unit price at creation
//! time. Later menu edits never alter historical order totals.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Role
// =============================================================================

/// The role of an authenticated principal.
///
/// Roles are a closed set and every role check in the platform matches on
/// this enum exhaustively. One role per principal at a time; role changes
/// are a profile-management concern, never performed by this core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Platform administrator: sees and may mutate everything.
    Admin,
    /// Owns one or more restaurants and fulfils their orders.
    RestaurantOwner,
    /// Places orders against restaurants.
    Customer,
}

impl Default for Role {
    fn default() -> Self {
        Role::Customer
    }
}

// =============================================================================
// User Profile
// =============================================================================

/// Role-bearing profile attached to an externally-authenticated user.
///
/// Authentication happens outside this system; `user_id` is the stable
/// identity the authenticator hands us. `user_id` is UNIQUE so concurrent
/// auto-provisioning can never create duplicates.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct UserProfile {
    pub id: String,
    pub user_id: String,
    pub role: Role,
    pub phone: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Restaurant
// =============================================================================

/// A restaurant, owned exclusively by one principal.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Restaurant {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Principal that owns this restaurant. Only the owner or an Admin
    /// may mutate the restaurant or anything under it.
    pub owner_id: String,

    /// Display name shown to customers.
    pub name: String,

    /// Optional long-form description.
    pub description: String,

    /// Street address.
    pub address: String,

    /// Contact phone number.
    pub phone: String,

    /// Whether the restaurant is visible to customers (soft delete).
    pub is_active: bool,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Menu Item
// =============================================================================

/// A dish offered by a restaurant.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct MenuItem {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Restaurant this item belongs to (owning relation).
    pub restaurant_id: String,

    /// Display name shown to customers and copied into order lines.
    pub name: String,

    /// Long-form description.
    pub description: String,

    /// Current price in cents. A point-in-time value: order lines keep
    /// their own copy, so changing this never rewrites order history.
    pub price_cents: i64,

    /// Whether customers can see this item.
    pub is_available: bool,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl MenuItem {
    /// Returns the current price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

// =============================================================================
// Order Status
// =============================================================================

/// The status of an order.
///
/// Transition rules live in [`crate::lifecycle`]; this is just the closed
/// set of states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Placed by the customer, awaiting the restaurant's decision.
    Pending,
    /// Accepted by the restaurant owner.
    Confirmed,
    /// Fulfilled. Terminal.
    Completed,
    /// Cancelled by either party. Terminal.
    Cancelled,
}

impl OrderStatus {
    /// Lowercase name, matching the persisted representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

// =============================================================================
// Order
// =============================================================================

/// A customer's purchase request against one restaurant.
///
/// Owned jointly: readable by the customer who placed it, the restaurant's
/// owner, and Admins. Created atomically with its lines; after creation only
/// status transitions touch it (status + updated_at, never price or lines).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Order {
    pub id: String,
    pub customer_id: String,
    pub restaurant_id: String,
    pub status: OrderStatus,
    /// Always equals the sum of line totals; maintained transactionally.
    pub total_cents: i64,
    pub notes: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Returns the order total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Order Line
// =============================================================================

/// One line of an order.
/// Uses the snapshot pattern to freeze menu item data at order time.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct OrderLine {
    pub id: String,
    pub order_id: String,
    pub menu_item_id: String,
    /// Menu item name at order time (frozen).
    pub name_snapshot: String,
    /// Quantity ordered, always >= 1.
    pub quantity: i64,
    /// Unit price in cents at order time (frozen).
    pub unit_price_cents: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl OrderLine {
    /// Returns the frozen unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns unit price × quantity as Money.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Order Aggregates & Requests
// =============================================================================

/// A normalized order-line request: one menu item id and a quantity.
///
/// The external API encodes lines as a list of single-key maps; the boundary
/// normalizes that shape into this struct before anything else touches it.
/// Duplicate menu item ids arriving as separate entries stay separate lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderLineRequest {
    pub menu_item_id: String,
    pub quantity: i64,
}

/// An order together with its lines, as returned by creation and reads.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderWithLines {
    pub order: Order,
    pub lines: Vec<OrderLine>,
}

impl OrderWithLines {
    /// Recomputes Σ(unit_price × quantity) over the lines.
    ///
    /// The persisted total must always equal this; exposed so callers and
    /// tests can assert the invariant without reaching into line math.
    pub fn computed_total(&self) -> Money {
        self.lines
            .iter()
            .fold(Money::zero(), |acc, line| acc + line.line_total())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
