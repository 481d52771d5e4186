//! # Error Types
//!
//! Domain-specific error types for mesa-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  mesa-core errors (this file)                                          │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  mesa-db errors (separate crate)                                       │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  mesa-service errors (separate crate)                                  │
//! │  └── ApiError         - What callers see (kind + message)              │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Caller       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (order id, status, ...)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

use crate::types::OrderStatus;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations or domain logic failures.
/// The service layer translates them into the caller-facing error surface.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Restaurant does not exist, or is outside the caller's visibility.
    #[error("Restaurant not found: {0}")]
    RestaurantNotFound(String),

    /// Menu item does not exist under the restaurant it was looked up in.
    ///
    /// ## When This Occurs
    /// - The id is unknown
    /// - The id exists but belongs to a different restaurant
    ///   (scoped lookup reports NotFound, never someone else's item)
    #[error("Menu item not found: {0}")]
    MenuItemNotFound(String),

    /// Order does not exist, or is outside the caller's visibility.
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// No profile exists for the principal and auto-provisioning is off.
    #[error("Profile not found for user: {0}")]
    ProfileNotFound(String),

    /// Authenticated but not authorized for the attempted action.
    #[error("{0}")]
    Forbidden(String),

    /// The state machine rejects the attempted transition.
    ///
    /// ## When This Occurs
    /// - Completing an order that was never confirmed
    /// - Any transition out of Completed or Cancelled
    /// - A concurrent transition won the race (status moved underneath us)
    #[error("Order {order_id} is {current}, cannot {action}")]
    InvalidTransition {
        order_id: String,
        current: OrderStatus,
        action: &'static str,
    },

    /// Order creation request carries more lines than allowed.
    #[error("Order cannot have more than {max} lines")]
    TooManyLines { max: usize },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when caller input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Invalid shape (e.g., a line entry that isn't a single-key map).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
