//! # Repository Module
//!
//! Database repository implementations for cart checkout.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repositories Inside a Unit of Work                   │
//! │                                                                         │
//! │  OrderService                                                          │
//! │       │                                                                 │
//! │       │  let mut uow = db.begin().await?;                              │
//! │       │  uow.points().find_available_by_member(id, now)                │
//! │       │  uow.products().update_stock(id, expected, new)                │
//! │       │  uow.commit().await?;                                          │
//! │       ▼                                                                 │
//! │  XxxRepository<'c> { conn: &'c mut SqliteConnection }                  │
//! │       │                                                                 │
//! │       │  SQL Query on the transaction's connection                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Every repository borrows one connection, so all statements of an     │
//! │  order placement share the same transaction.                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`MemberRepository`](member::MemberRepository) - Member lookup
//! - [`ProductRepository`](product::ProductRepository) - Product lookup and stock
//! - [`CartItemRepository`](cart_item::CartItemRepository) - Cart lines
//! - [`PointRepository`](point::PointRepository) - Point records
//! - [`OrderRepository`](order::OrderRepository) - Orders and order items

pub mod cart_item;
pub mod member;
pub mod order;
pub mod point;
pub mod product;

use chrono::{DateTime, SecondsFormat, Utc};

/// Formats a timestamp for a TEXT column.
///
/// Fixed-width UTC with nanoseconds, so string comparison in SQL
/// (`expired_at > ?`, `ORDER BY created_at`) matches chronological order.
pub(crate) fn sql_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Nanos, true)
}
