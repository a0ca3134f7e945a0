//! # cart-core: Pure Business Logic for Cart Checkout
//!
//! Everything that decides whether an order may be placed, as pure functions
//! with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Cart Order Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │          Presentation (HTTP, auth) - outside workspace          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ OrderRequest / OrderView               │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │      cart-db: OrderService (unit of work + repositories)        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ cart-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   point   │  │   cart    │  │   order   │  │ validation│  │   │
//! │  │   │ OrderPoint│  │ validate_ │  │ NewOrder  │  │  request  │  │   │
//! │  │   │ consume   │  │ cart_line │  │ checksum  │  │  shape    │  │   │
//! │  │   │ accrue    │  │           │  │           │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Member, Product, CartItem, Point, Order, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`point`] - Point ledger: redemption and accrual policy
//! - [`cart`] - Cart line ownership and stock checks
//! - [`order`] - Immutable order assembly and total checksum
//! - [`error`] - Domain error types and stable error codes
//! - [`validation`] - Request shape validation
//!
//! ## Example Usage
//!
//! ```rust
//! use cart_core::point::{OrderPoint, PointPolicy};
//! use cart_core::Member;
//! use chrono::Utc;
//!
//! let member = Member { id: 1, email: "hardy@example.com".to_string() };
//! let ledger = OrderPoint::new(PointPolicy::new(1000, 30).unwrap());
//!
//! let earned = ledger.accrue(&member, 0, 65_000, Utc::now()).unwrap();
//! assert_eq!(earned.earned_point, 6_500);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod order;
pub mod point;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{CartLine, StockDecrement, ValidatedCartItem};
pub use error::{CoreError, CoreResult, ErrorCode, ValidationError};
pub use money::Money;
pub use order::NewOrder;
pub use point::{OrderPoint, PointDeduction, PointPolicy, PointRate};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default accrual rate: 10% of the order total comes back as points.
pub const DEFAULT_POINT_RATE_BPS: u32 = 1000;

/// Default number of days earned points stay redeemable.
pub const DEFAULT_POINT_VALIDITY_DAYS: i64 = 30;

/// Maximum cart lines in a single order.
pub const MAX_ORDER_LINES: usize = 100;
