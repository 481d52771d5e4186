//! # Repository Module
//!
//! Database repository implementations for Mesa.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  Service call                                                          │
//! │       │                                                                 │
//! │       │  db.orders().list_by_customer("user-1")                        │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  OrderRepository                                                       │
//! │  ├── create(&self, customer_id, restaurant_id, lines, notes)           │
//! │  ├── get_by_id(&self, id)                                              │
//! │  ├── set_status(&self, id, expected, next)                             │
//! │  └── list_by_* (visibility queries)                                    │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • Clean separation of concerns                                        │
//! │  • SQL is isolated in one place                                        │
//! │  • Authorization stays out of the data layer                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`profile::ProfileRepository`] - User profiles and role lookup
//! - [`restaurant::RestaurantRepository`] - Restaurant CRUD
//! - [`menu_item::MenuItemRepository`] - Menu item CRUD and scoped lookup
//! - [`order::OrderRepository`] - Atomic order creation and transitions

pub mod menu_item;
pub mod order;
pub mod profile;
pub mod restaurant;
