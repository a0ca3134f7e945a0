//! # Domain Types
//!
//! Core domain types for cart checkout.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Member       │   │    Product      │   │    CartItem     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  id             │       │
//! │  │  email          │   │  price, stock   │   │  member_id (FK) │       │
//! │  └─────────────────┘   └─────────────────┘   │  product_id     │       │
//! │                                              │  quantity       │       │
//! │  ┌─────────────────┐   ┌─────────────────┐   └─────────────────┘       │
//! │  │     Point       │   │     Order       │   ┌─────────────────┐       │
//! │  │  ─────────────  │   │  ─────────────  │   │   OrderItem     │       │
//! │  │  earned_point   │   │  used_point     │   │  ─────────────  │       │
//! │  │  left_point     │   │  earned_point   │   │  snapshot of    │       │
//! │  │  expired_at     │   │  point_id (FK)  │   │  name/price/img │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All amounts (prices, points) are `i64` in the smallest unit. Every entity
//! uses an integer id assigned by the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;

// =============================================================================
// Member
// =============================================================================

/// The customer placing orders. Read-only to this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Member {
    pub id: i64,
    pub email: String,
}

// =============================================================================
// Product
// =============================================================================

/// A product that can be put in a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,

    /// Display name, copied onto order items.
    pub name: String,

    /// Unit price in the smallest currency unit.
    pub price: i64,

    pub image_url: String,

    /// Units on hand. Decremented when an order is placed.
    pub stock: i64,
}

impl Product {
    /// Checks if `quantity` units can be taken from stock.
    #[inline]
    pub fn has_stock_for(&self, quantity: i64) -> bool {
        quantity <= self.stock
    }
}

// =============================================================================
// Cart Item
// =============================================================================

/// One line of a member's cart.
///
/// Consumed (deleted) exactly once by a successful order placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CartItem {
    pub id: i64,
    pub member_id: i64,
    pub product_id: i64,
    pub quantity: i64,
}

impl CartItem {
    /// Checks whether this line belongs to `member`.
    #[inline]
    pub fn is_owned_by(&self, member: &Member) -> bool {
        self.member_id == member.id
    }
}

// =============================================================================
// Point
// =============================================================================

/// A batch of loyalty points earned by one order.
///
/// ## Lifecycle
/// ```text
/// accrue() ──► NewPoint ──► stored as Point { left_point = earned_point }
///                                   │
///                                   ▼
///             consume() lowers left_point in place (never below 0)
///                                   │
///                                   ▼
///             unavailable once left_point == 0 or expired_at <= now
/// ```
/// Point rows are never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Point {
    pub id: i64,
    pub member_id: i64,

    /// Amount originally earned.
    pub earned_point: i64,

    /// Amount still redeemable.
    pub left_point: i64,

    /// When the points were earned.
    pub created_at: DateTime<Utc>,

    /// Points are unusable at or after this instant.
    pub expired_at: DateTime<Utc>,
}

impl Point {
    /// A point is available when it has a balance and has not expired at `now`.
    #[inline]
    pub fn is_available(&self, now: DateTime<Utc>) -> bool {
        self.left_point > 0 && self.expired_at > now
    }
}

/// A point record that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPoint {
    pub member_id: i64,
    pub earned_point: i64,
    pub left_point: i64,
    pub created_at: DateTime<Utc>,
    pub expired_at: DateTime<Utc>,
}

// =============================================================================
// Order
// =============================================================================

/// A placed order. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub member_id: i64,

    /// The point record earned by this order.
    pub point_id: i64,
    pub used_point: i64,
    pub earned_point: i64,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Checks whether this order belongs to `member`.
    #[inline]
    pub fn is_owned_by(&self, member: &Member) -> bool {
        self.member_id == member.id
    }
}

/// One line of an order.
///
/// ## Snapshot Pattern
/// Product name, price and image are copied at order time so later product
/// edits do not rewrite order history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub product_id: i64,
    pub name: String,

    /// Unit price at order time.
    pub price: i64,
    pub image_url: String,
    pub quantity: i64,
}

impl OrderItem {
    /// Takes a snapshot of `product` for `quantity` units.
    pub fn snapshot(product: &Product, quantity: i64) -> Self {
        OrderItem {
            product_id: product.id,
            name: product.name.clone(),
            price: product.price,
            image_url: product.image_url.clone(),
            quantity,
        }
    }

    /// Unit price × quantity, or `None` when it overflows.
    #[inline]
    pub fn line_total(&self) -> Option<Money> {
        Money::from_minor(self.price).checked_multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Request / View DTOs
// =============================================================================

/// What the caller submits to place an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    /// Cart lines to check out, in display order.
    pub cart_item_ids: Vec<i64>,

    /// Total the client believes it is paying.
    pub total_price: i64,

    /// Points to redeem.
    pub point: i64,
}

/// Read-side view of one order line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemView {
    pub product_id: i64,
    pub name: String,
    pub price: i64,
    pub image_url: String,
    pub quantity: i64,
}

impl From<OrderItem> for OrderItemView {
    fn from(item: OrderItem) -> Self {
        OrderItemView {
            product_id: item.product_id,
            name: item.name,
            price: item.price,
            image_url: item.image_url,
            quantity: item.quantity,
        }
    }
}

/// Read-side view of an order with its lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    pub order_id: i64,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderItemView>,

    /// Derived from the lines, not stored on the order.
    pub total_price: i64,
    pub used_point: i64,
    pub earned_point: i64,
}

impl OrderView {
    /// Assembles the view, recomputing the total from the lines.
    pub fn assemble(order: &Order, items: Vec<OrderItem>) -> CoreResult<Self> {
        let total = Money::checked_sum(items.iter().map(OrderItem::line_total))
            .ok_or(CoreError::TotalPriceOverflow)?;

        Ok(OrderView {
            order_id: order.id,
            created_at: order.created_at,
            items: items.into_iter().map(OrderItemView::from).collect(),
            total_price: total.minor(),
            used_point: order.used_point,
            earned_point: order.earned_point,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
