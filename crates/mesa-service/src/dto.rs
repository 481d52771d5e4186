//! # Boundary DTOs
//!
//! Request and response shapes exchanged with transports.
//!
//! ## The Order-Line Encoding
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │            External Shape vs. Internal Shape                            │
//! │                                                                         │
//! │  Wire (kept for compatibility):                                        │
//! │    { "restaurantId": "...",                                            │
//! │      "items": [ { "<menu-item-id>": 2 }, { "<menu-item-id>": 1 } ],    │
//! │      "notes": "extra spicy" }                                          │
//! │                                                                         │
//! │  Each items entry is a map with EXACTLY ONE key. The shape is          │
//! │  normalized at this boundary into Vec<OrderLineRequest> before any     │
//! │  business logic runs - nothing past this module ever sees the maps.    │
//! │                                                                         │
//! │  The same menu item id appearing in two entries is two lines. The      │
//! │  encoding makes per-entry duplicates impossible (JSON object keys),    │
//! │  and cross-entry duplicates are preserved, not merged.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use mesa_core::validation::{validate_notes, validate_quantity};
use mesa_core::{
    CoreError, Order, OrderLine, OrderLineRequest, OrderStatus, Restaurant, ValidationError,
    MAX_ORDER_LINES,
};

// =============================================================================
// Requests
// =============================================================================

/// Order creation request.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CreateOrderRequest {
    pub restaurant_id: String,
    /// List of single-key maps: `[{menuItemId: quantity}, ...]`
    pub items: Vec<BTreeMap<String, i64>>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl CreateOrderRequest {
    /// Normalizes the wire encoding into line requests.
    ///
    /// ## Errors
    /// - empty `items` list
    /// - an entry with zero or multiple keys
    /// - a quantity outside [1, MAX_LINE_QUANTITY]
    /// - over-long notes
    pub fn normalized_lines(&self) -> Result<Vec<OrderLineRequest>, CoreError> {
        if self.items.is_empty() {
            return Err(ValidationError::Required {
                field: "items".to_string(),
            }
            .into());
        }

        if self.items.len() > MAX_ORDER_LINES {
            return Err(CoreError::TooManyLines {
                max: MAX_ORDER_LINES,
            });
        }

        if let Some(notes) = &self.notes {
            validate_notes(notes)?;
        }

        let mut lines = Vec::with_capacity(self.items.len());
        for entry in &self.items {
            let mut pairs = entry.iter();
            let (menu_item_id, quantity) = match (pairs.next(), pairs.next()) {
                (Some(pair), None) => pair,
                _ => {
                    return Err(ValidationError::InvalidFormat {
                        field: "items".to_string(),
                        reason: "each entry must map exactly one menu item id to a quantity"
                            .to_string(),
                    }
                    .into())
                }
            };

            validate_quantity(*quantity)?;

            lines.push(OrderLineRequest {
                menu_item_id: menu_item_id.clone(),
                quantity: *quantity,
            });
        }

        Ok(lines)
    }
}

/// Restaurant creation request.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CreateRestaurantRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub address: String,
    pub phone: String,
}

/// Restaurant update request. Absent fields stay unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UpdateRestaurantRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// Menu item creation request.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CreateMenuItemRequest {
    pub restaurant_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price_cents: i64,
    #[serde(default = "default_true")]
    pub is_available: bool,
}

/// Menu item update request. Absent fields stay unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UpdateMenuItemRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price_cents: Option<i64>,
    #[serde(default)]
    pub is_available: Option<bool>,
}

fn default_true() -> bool {
    true
}

// =============================================================================
// Responses
// =============================================================================

/// Compact restaurant reference embedded in order responses.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RestaurantSummary {
    pub id: String,
    pub name: String,
}

impl From<&Restaurant> for RestaurantSummary {
    fn from(restaurant: &Restaurant) -> Self {
        RestaurantSummary {
            id: restaurant.id.clone(),
            name: restaurant.name.clone(),
        }
    }
}

/// One order line as shown to callers.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderLineResponse {
    pub id: String,
    pub menu_item_id: String,
    /// Name at order time, not the menu's current name.
    pub name: String,
    pub quantity: i64,
    /// Price snapshot at order time.
    pub unit_price_cents: i64,
    pub line_total_cents: i64,
}

impl From<OrderLine> for OrderLineResponse {
    fn from(line: OrderLine) -> Self {
        let line_total_cents = line.line_total().cents();
        OrderLineResponse {
            id: line.id,
            menu_item_id: line.menu_item_id,
            name: line.name_snapshot,
            quantity: line.quantity,
            unit_price_cents: line.unit_price_cents,
            line_total_cents,
        }
    }
}

/// Full order representation returned by the order service.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderResponse {
    pub id: String,
    pub customer_id: String,
    pub restaurant: RestaurantSummary,
    pub items: Vec<OrderLineResponse>,
    pub status: OrderStatus,
    pub total_cents: i64,
    pub notes: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl OrderResponse {
    /// Assembles the response from its loaded parts.
    pub fn from_parts(order: Order, lines: Vec<OrderLine>, restaurant: &Restaurant) -> Self {
        OrderResponse {
            id: order.id,
            customer_id: order.customer_id,
            restaurant: RestaurantSummary::from(restaurant),
            items: lines.into_iter().map(OrderLineResponse::from).collect(),
            status: order.status,
            total_cents: order.total_cents,
            notes: order.notes,
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
