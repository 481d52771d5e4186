//! # mesa-service: Application Services for Mesa
//!
//! The layer any transport talks to. Each service resolves the calling
//! principal's role, applies visibility and authorization, and delegates
//! persistence to mesa-db.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Mesa Services                                   │
//! │                                                                         │
//! │  Transport (HTTP / gRPC / IPC - external)                              │
//! │       │  user_id from the authenticator + request DTO                  │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  mesa-service (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌────────────────┐  ┌────────────────┐  ┌────────────────┐  │   │
//! │  │   │IdentityResolver│  │ CatalogService │  │  OrderService  │  │   │
//! │  │   │ role lookup +  │◄─│ visibility +   │  │ atomic create, │  │   │
//! │  │   │ auto-provision │  │ mutation authz │  │ transitions    │  │   │
//! │  │   └────────────────┘  └────────────────┘  └────────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  mesa-db repositories                                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mesa_db::{Database, DbConfig};
//! use mesa_service::{CatalogService, IdentityResolver, OrderService};
//!
//! let db = Database::new(DbConfig::new("./mesa.db")).await?;
//! let identity = IdentityResolver::new(&db);
//! let catalog = CatalogService::new(&db, identity.clone());
//! let orders = OrderService::new(&db, identity);
//!
//! let response = orders.create_order("user-1", request).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod dto;
pub mod error;
pub mod identity;
pub mod orders;

// =============================================================================
// Re-exports
// =============================================================================

pub use catalog::CatalogService;
pub use dto::{
    CreateMenuItemRequest, CreateOrderRequest, CreateRestaurantRequest, OrderLineResponse,
    OrderResponse, RestaurantSummary, UpdateMenuItemRequest, UpdateRestaurantRequest,
};
pub use error::{ApiError, ErrorCode};
pub use identity::IdentityResolver;
pub use orders::OrderService;
