//! # cart-db: Storage and Order Services
//!
//! This crate stores carts, points and orders in SQLite and exposes the
//! services that place and read orders.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Checkout Data Flow                               │
//! │                                                                         │
//! │  Presentation layer (HTTP handler, CLI, ...)                           │
//! │       │  place_order(member, OrderRequest)                             │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     cart-db (THIS CRATE)                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Services    │    │  UnitOfWork   │    │  Migrations  │  │   │
//! │  │   │ (service/)    │───►│ + Repositories│    │  (embedded)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ OrderService  │    │ PointRepo     │    │ 001_init.sql │  │   │
//! │  │   │ OrderQuery-   │    │ ProductRepo   │    │              │  │   │
//! │  │   │   Service     │    │ CartItemRepo  │    │              │  │   │
//! │  │   └───────┬───────┘    │ OrderRepo     │    └──────────────┘  │   │
//! │  │           │            └───────────────┘                      │   │
//! │  │           ▼                                                    │   │
//! │  │   cart-core: OrderPoint, validate_cart_line, NewOrder          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database (./cart.db)                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`unit_of_work`] - One transaction shared by many repositories
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (point, product, order, ...)
//! - [`service`] - Order placement and order queries
//! - [`config`] - Environment configuration
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cart_db::{AppConfig, Database, OrderQueryService, OrderService};
//!
//! let config = AppConfig::load()?;
//! let db = Database::new(config.db_config()).await?;
//!
//! let order_id = OrderService::from_config(db.clone(), &config)?
//!     .place_order(&member, &request)
//!     .await?;
//! let view = OrderQueryService::new(db).get_order(&member, order_id).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod service;
pub mod unit_of_work;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{AppConfig, ConfigError};
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use service::{ErrorResponse, OrderError, OrderQueryService, OrderResult, OrderService};
pub use unit_of_work::UnitOfWork;

// Repository re-exports for convenience
pub use repository::cart_item::CartItemRepository;
pub use repository::member::MemberRepository;
pub use repository::order::OrderRepository;
pub use repository::point::PointRepository;
pub use repository::product::{NewProduct, ProductRepository};
