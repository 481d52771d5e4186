//! # Order Repository
//!
//! Database operations for orders and order lines.
//!
//! ## Creation Protocol
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  Atomic Order Creation                                  │
//! │                                                                         │
//! │  BEGIN TRANSACTION                                                     │
//! │     │                                                                   │
//! │     ├── INSERT order shell (status=pending, total=0)                   │
//! │     │                                                                   │
//! │     ├── for each requested line:                                       │
//! │     │     ├── SELECT menu item WHERE id AND restaurant_id  ← scoped    │
//! │     │     │     └── miss? ROLLBACK, return NotFound                    │
//! │     │     ├── INSERT order line with price snapshot                    │
//! │     │     └── total += price × quantity                                │
//! │     │                                                                   │
//! │     ├── UPDATE order SET total = accumulated sum                       │
//! │     │                                                                   │
//! │  COMMIT                                                                │
//! │                                                                         │
//! │  Readers never see the shell with total=0: nothing is visible          │
//! │  outside the transaction until COMMIT.                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Status Updates
//! `set_status` is a compare-and-set: the UPDATE is conditioned on the
//! expected prior status, so two concurrent transitions cannot both win.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use mesa_core::{Money, Order, OrderLine, OrderLineRequest, OrderStatus, OrderWithLines};

const ORDER_COLUMNS: &str =
    "id, customer_id, restaurant_id, status, total_cents, notes, created_at, updated_at";

const ORDER_LINE_COLUMNS: &str =
    "id, order_id, menu_item_id, name_snapshot, quantity, unit_price_cents, created_at";

const MENU_ITEM_COLUMNS: &str =
    "id, restaurant_id, name, description, price_cents, is_available, created_at, updated_at";

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Creates an order with all its lines in one transaction.
    ///
    /// ## Arguments
    /// * `customer_id` - principal placing the order
    /// * `restaurant_id` - restaurant being ordered from (must exist;
    ///   enforced by the caller and by the foreign key)
    /// * `lines` - normalized line requests; duplicates stay distinct lines
    /// * `notes` - free-text notes, passed through verbatim
    ///
    /// ## Atomicity
    /// Any line referencing a menu item outside `restaurant_id` rolls the
    /// whole transaction back; no order or line row survives.
    ///
    /// ## Snapshot Pattern
    /// Each line copies the menu item's name and current price. Later menu
    /// edits never change this order's total.
    pub async fn create(
        &self,
        customer_id: &str,
        restaurant_id: &str,
        lines: &[OrderLineRequest],
        notes: Option<String>,
    ) -> DbResult<OrderWithLines> {
        let order_id = Uuid::new_v4().to_string();
        let now = Utc::now();

        debug!(
            order_id = %order_id,
            restaurant_id = %restaurant_id,
            lines = lines.len(),
            "Creating order"
        );

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO orders (
                id, customer_id, restaurant_id, status,
                total_cents, notes, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, 0, ?5, ?6, ?6)
            "#,
        )
        .bind(&order_id)
        .bind(customer_id)
        .bind(restaurant_id)
        .bind(OrderStatus::Pending)
        .bind(&notes)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        let mut total = Money::zero();
        let mut stored_lines = Vec::with_capacity(lines.len());

        for line in lines {
            // Scoped lookup inside the transaction: the item must belong to
            // the restaurant being ordered from.
            let item = sqlx::query_as::<_, mesa_core::MenuItem>(&format!(
                "SELECT {MENU_ITEM_COLUMNS} FROM menu_items WHERE id = ?1 AND restaurant_id = ?2"
            ))
            .bind(&line.menu_item_id)
            .bind(restaurant_id)
            .fetch_optional(&mut *tx)
            .await?;

            let Some(item) = item else {
                tx.rollback().await?;
                return Err(DbError::not_found("Menu item", &line.menu_item_id));
            };

            let stored = OrderLine {
                id: Uuid::new_v4().to_string(),
                order_id: order_id.clone(),
                menu_item_id: item.id.clone(),
                name_snapshot: item.name.clone(),
                quantity: line.quantity,
                unit_price_cents: item.price_cents,
                created_at: now,
            };

            sqlx::query(
                r#"
                INSERT INTO order_lines (
                    id, order_id, menu_item_id, name_snapshot,
                    quantity, unit_price_cents, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
            )
            .bind(&stored.id)
            .bind(&stored.order_id)
            .bind(&stored.menu_item_id)
            .bind(&stored.name_snapshot)
            .bind(stored.quantity)
            .bind(stored.unit_price_cents)
            .bind(stored.created_at)
            .execute(&mut *tx)
            .await?;

            total += item.price().multiply_quantity(line.quantity);
            stored_lines.push(stored);
        }

        sqlx::query("UPDATE orders SET total_cents = ?2 WHERE id = ?1")
            .bind(&order_id)
            .bind(total.cents())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        debug!(order_id = %order_id, total = %total, "Order created");

        let order = Order {
            id: order_id,
            customer_id: customer_id.to_string(),
            restaurant_id: restaurant_id.to_string(),
            status: OrderStatus::Pending,
            total_cents: total.cents(),
            notes,
            created_at: now,
            updated_at: now,
        };

        Ok(OrderWithLines {
            order,
            lines: stored_lines,
        })
    }

    /// Gets an order by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    /// Gets all lines of an order, in insertion order.
    pub async fn get_lines(&self, order_id: &str) -> DbResult<Vec<OrderLine>> {
        let lines = sqlx::query_as::<_, OrderLine>(&format!(
            r#"
            SELECT {ORDER_LINE_COLUMNS}
            FROM order_lines
            WHERE order_id = ?1
            ORDER BY rowid
            "#
        ))
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    /// Conditionally moves an order from `expected` to `next`.
    ///
    /// Returns false when zero rows matched - either the order is gone or a
    /// concurrent transition already moved it past `expected`. The caller
    /// decides how to report that; this layer just refuses the lost update.
    pub async fn set_status(
        &self,
        id: &str,
        expected: OrderStatus,
        next: OrderStatus,
    ) -> DbResult<bool> {
        let now = Utc::now();

        debug!(order_id = %id, from = %expected, to = %next, "Updating order status");

        let result = sqlx::query(
            r#"
            UPDATE orders SET
                status = ?2,
                updated_at = ?3
            WHERE id = ?1 AND status = ?4
            "#,
        )
        .bind(id)
        .bind(next)
        .bind(now)
        .bind(expected)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists every order on the platform, newest first. Admin view.
    pub async fn list_all(&self) -> DbResult<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    /// Lists orders placed by a customer, newest first.
    pub async fn list_by_customer(&self, customer_id: &str) -> DbResult<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            r#"
            SELECT {ORDER_COLUMNS}
            FROM orders
            WHERE customer_id = ?1
            ORDER BY created_at DESC
            "#
        ))
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    /// Lists orders against any restaurant a principal owns, newest first.
    pub async fn list_by_restaurant_owner(&self, owner_id: &str) -> DbResult<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            r#"
            SELECT o.id, o.customer_id, o.restaurant_id, o.status,
                   o.total_cents, o.notes, o.created_at, o.updated_at
            FROM orders o
            INNER JOIN restaurants r ON r.id = o.restaurant_id
            WHERE r.owner_id = ?1
            ORDER BY o.created_at DESC
            "#
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    /// Counts all orders (for diagnostics and the seed binary).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Counts all order lines.
    pub async fn count_lines(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM order_lines")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
