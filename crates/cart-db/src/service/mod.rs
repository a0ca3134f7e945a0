//! # Order Services
//!
//! The operations a presentation layer calls.
//!
//! - [`OrderService`] places an order atomically
//! - [`OrderQueryService`] reads a member's orders back
//!
//! ```rust,ignore
//! let service = OrderService::from_config(db.clone(), &config)?;
//! let order_id = service.place_order(&member, &request).await?;
//!
//! let view = OrderQueryService::new(db).get_order(&member, order_id).await?;
//! ```

pub mod error;
pub mod order;
pub mod query;

#[cfg(test)]
mod fixture;

pub use error::{ErrorResponse, OrderError, OrderResult};
pub use order::OrderService;
pub use query::OrderQueryService;
