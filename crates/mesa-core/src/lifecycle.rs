//! # Order Lifecycle
//!
//! The order status state machine and per-transition authorization rules.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Order Lifecycle                                   │
//! │                                                                         │
//! │                 confirm                complete                         │
//! │   ┌─────────┐ ──────────► ┌───────────┐ ──────────► ┌───────────┐     │
//! │   │ Pending │             │ Confirmed │             │ Completed │     │
//! │   └────┬────┘             └─────┬─────┘             └───────────┘     │
//! │        │ cancel                 │ cancel              (terminal)       │
//! │        └──────────┬─────────────┘                                      │
//! │                   ▼                                                     │
//! │             ┌───────────┐                                              │
//! │             │ Cancelled │  (terminal)                                  │
//! │             └───────────┘                                              │
//! │                                                                         │
//! │  Any edge not drawn above is rejected - including every edge out of    │
//! │  a terminal state. Re-confirming a Confirmed order is a hard error,    │
//! │  never a silent no-op.                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Who May Trigger What
//! | Transition | Allowed actor                                 |
//! |------------|-----------------------------------------------|
//! | confirm    | restaurant owner, or Admin                    |
//! | complete   | restaurant owner, or Admin                    |
//! | cancel     | order's customer, restaurant owner, or Admin  |
//!
//! Ownership checks compare identities, not roles: a principal who placed
//! an order may cancel it whatever their role, and Admin overrides all.

use crate::types::{OrderStatus, Role};

// =============================================================================
// Actor
// =============================================================================

/// A resolved principal: stable identity plus role.
///
/// Produced by the identity resolver; consumed by every authorization
/// decision in the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: String,
    pub role: Role,
}

impl Actor {
    pub fn new(user_id: impl Into<String>, role: Role) -> Self {
        Actor {
            user_id: user_id.into(),
            role,
        }
    }

    /// True for platform administrators.
    #[inline]
    pub fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }
}

// =============================================================================
// Order Actions
// =============================================================================

/// A status-changing action on an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderAction {
    /// Restaurant accepts the order: Pending → Confirmed.
    Confirm,
    /// Restaurant fulfils the order: Confirmed → Completed.
    Complete,
    /// Either party backs out: Pending/Confirmed → Cancelled.
    Cancel,
}

impl OrderAction {
    /// Lowercase verb for error messages and logs.
    pub const fn verb(self) -> &'static str {
        match self {
            OrderAction::Confirm => "confirm",
            OrderAction::Complete => "complete",
            OrderAction::Cancel => "cancel",
        }
    }

    /// The status this action moves an order into.
    pub const fn target(self) -> OrderStatus {
        match self {
            OrderAction::Confirm => OrderStatus::Confirmed,
            OrderAction::Complete => OrderStatus::Completed,
            OrderAction::Cancel => OrderStatus::Cancelled,
        }
    }

    /// The statuses this action may legally start from.
    pub const fn allowed_from(self) -> &'static [OrderStatus] {
        match self {
            OrderAction::Confirm => &[OrderStatus::Pending],
            OrderAction::Complete => &[OrderStatus::Confirmed],
            OrderAction::Cancel => &[OrderStatus::Pending, OrderStatus::Confirmed],
        }
    }

    /// Whether the state machine permits this action from `current`.
    pub fn permits(self, current: OrderStatus) -> bool {
        self.allowed_from().contains(&current)
    }

    /// Whether `actor` is allowed to trigger this action on an order placed
    /// by `customer_id` against a restaurant owned by `restaurant_owner_id`.
    ///
    /// Authorization is independent of the state machine: a forbidden actor
    /// is rejected before the current status is even considered.
    pub fn authorizes(self, actor: &Actor, customer_id: &str, restaurant_owner_id: &str) -> bool {
        if actor.is_admin() {
            return true;
        }
        match self {
            OrderAction::Confirm | OrderAction::Complete => actor.user_id == restaurant_owner_id,
            OrderAction::Cancel => {
                actor.user_id == restaurant_owner_id || actor.user_id == customer_id
            }
        }
    }
}

impl OrderStatus {
    /// Whether this status accepts no further transitions.
    pub const fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn owner() -> Actor {
        Actor::new("owner-1", Role::RestaurantOwner)
    }

    fn customer() -> Actor {
        Actor::new("cust-1", Role::Customer)
    }

    fn admin() -> Actor {
        Actor::new("admin-1", Role::Admin)
    }

    #[test]
    fn test_confirm_only_from_pending() {
        assert!(OrderAction::Confirm.permits(OrderStatus::Pending));
        assert!(!OrderAction::Confirm.permits(OrderStatus::Confirmed));
        assert!(!OrderAction::Confirm.permits(OrderStatus::Completed));
        assert!(!OrderAction::Confirm.permits(OrderStatus::Cancelled));
    }

    #[test]
    fn test_complete_only_from_confirmed() {
        assert!(OrderAction::Complete.permits(OrderStatus::Confirmed));
        assert!(!OrderAction::Complete.permits(OrderStatus::Pending));
        assert!(!OrderAction::Complete.permits(OrderStatus::Completed));
    }

    #[test]
    fn test_cancel_from_pending_or_confirmed() {
        assert!(OrderAction::Cancel.permits(OrderStatus::Pending));
        assert!(OrderAction::Cancel.permits(OrderStatus::Confirmed));
        assert!(!OrderAction::Cancel.permits(OrderStatus::Completed));
        assert!(!OrderAction::Cancel.permits(OrderStatus::Cancelled));
    }

    #[test]
    fn test_terminal_states() {
        assert!(OrderStatus::Completed.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(!OrderStatus::Pending.is_terminal());
        assert!(!OrderStatus::Confirmed.is_terminal());
    }

    #[test]
    fn test_targets() {
        assert_eq!(OrderAction::Confirm.target(), OrderStatus::Confirmed);
        assert_eq!(OrderAction::Complete.target(), OrderStatus::Completed);
        assert_eq!(OrderAction::Cancel.target(), OrderStatus::Cancelled);
    }

    #[test]
    fn test_owner_confirms_customer_does_not() {
        assert!(OrderAction::Confirm.authorizes(&owner(), "cust-1", "owner-1"));
        assert!(!OrderAction::Confirm.authorizes(&customer(), "cust-1", "owner-1"));
    }

    #[test]
    fn test_customer_may_cancel_own_order() {
        assert!(OrderAction::Cancel.authorizes(&customer(), "cust-1", "owner-1"));
        // ...but not somebody else's
        assert!(!OrderAction::Cancel.authorizes(&customer(), "cust-2", "owner-1"));
    }

    #[test]
    fn test_other_owner_is_rejected() {
        let other = Actor::new("owner-2", Role::RestaurantOwner);
        assert!(!OrderAction::Confirm.authorizes(&other, "cust-1", "owner-1"));
        assert!(!OrderAction::Cancel.authorizes(&other, "cust-1", "owner-1"));
    }

    #[test]
    fn test_admin_overrides_everything() {
        for action in [OrderAction::Confirm, OrderAction::Complete, OrderAction::Cancel] {
            assert!(action.authorizes(&admin(), "cust-1", "owner-1"));
        }
    }

    #[test]
    fn test_owner_who_ordered_elsewhere_can_cancel() {
        // A restaurant owner who placed an order at another restaurant is
        // that order's customer and may cancel it.
        let moonlighting = Actor::new("owner-1", Role::RestaurantOwner);
        assert!(OrderAction::Cancel.authorizes(&moonlighting, "owner-1", "owner-9"));
        assert!(!OrderAction::Confirm.authorizes(&moonlighting, "owner-1", "owner-9"));
    }
}
