//! # Service Error Type
//!
//! Unified error type for order operations.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow Out of the Services                       │
//! │                                                                         │
//! │  place_order / get_order / list_orders                                 │
//! │       │                                                                 │
//! │       ├── Business rule refused? ─── CoreError ───► OrderError::Core    │
//! │       │                              (never retryable)                  │
//! │       │                                                                 │
//! │       ├── Storage failed?       ─── DbError ─────► OrderError::Db      │
//! │       │                              (retryable if transient)           │
//! │       │                                                                 │
//! │       └── Deadline passed?      ─────────────────► OrderError::TimedOut │
//! │                                                                         │
//! │  In every error case the unit of work is dropped, so nothing persists. │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

use crate::error::DbError;
use cart_core::{CoreError, ErrorCode, ValidationError};

/// Error returned by [`OrderService`](super::OrderService) and
/// [`OrderQueryService`](super::OrderQueryService).
#[derive(Debug, Error)]
pub enum OrderError {
    /// The request was refused by a business rule.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The store failed; infrastructure, not a business decision.
    #[error(transparent)]
    Db(#[from] DbError),

    /// Placement did not finish before the configured deadline.
    #[error("Order placement timed out after {0:?}")]
    TimedOut(Duration),
}

impl From<ValidationError> for OrderError {
    fn from(err: ValidationError) -> Self {
        OrderError::Core(CoreError::Validation(err))
    }
}

impl OrderError {
    /// Returns the machine-readable code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            OrderError::Core(e) => e.code(),
            OrderError::Db(_) => ErrorCode::DatabaseError,
            OrderError::TimedOut(_) => ErrorCode::Timeout,
        }
    }

    pub fn status_code(&self) -> u16 {
        self.code().status_code()
    }

    /// Whether the caller may retry the same request unchanged.
    ///
    /// Business rejections never are. Lost compare-and-set races, a busy
    /// database and timeouts are.
    pub fn is_retryable(&self) -> bool {
        match self {
            OrderError::Core(_) => false,
            OrderError::Db(e) => e.is_transient(),
            OrderError::TimedOut(_) => true,
        }
    }

    /// Serializable body for the presentation layer.
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.code(),
            status: self.status_code(),
            message: self.to_string(),
        }
    }
}

/// What a caller sees when an operation fails.
///
/// ```json
/// {
///   "code": "INSUFFICIENT_POINTS",
///   "status": 409,
///   "message": "Insufficient points: available 1000, requested 1500"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub code: ErrorCode,
    pub status: u16,
    pub message: String,
}

/// Result type for service operations.
pub type OrderResult<T> = Result<T, OrderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_business_errors_not_retryable() {
        let err = OrderError::from(CoreError::InsufficientPoints {
            available: 1000,
            requested: 1500,
        });
        assert!(!err.is_retryable());
        assert_eq!(err.code(), ErrorCode::InsufficientPoints);
        assert_eq!(err.status_code(), 409);
    }

    #[test]
    fn test_infrastructure_errors() {
        let conflict = OrderError::from(DbError::conflict("Product", 3));
        assert!(conflict.is_retryable());
        assert_eq!(conflict.code(), ErrorCode::DatabaseError);
        assert_eq!(conflict.status_code(), 500);

        let broken = OrderError::from(DbError::QueryFailed("no such table".to_string()));
        assert!(!broken.is_retryable());

        let timed_out = OrderError::TimedOut(Duration::from_secs(2));
        assert!(timed_out.is_retryable());
        assert_eq!(timed_out.status_code(), 503);
    }

    #[test]
    fn test_validation_converts_to_core() {
        let err = OrderError::from(ValidationError::Required {
            field: "cartItemIds".to_string(),
        });
        assert!(matches!(err, OrderError::Core(CoreError::Validation(_))));
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_response_body() {
        let response = OrderError::from(CoreError::OrderNotFound(7)).to_response();
        assert_eq!(response.code, ErrorCode::OrderNotFound);
        assert_eq!(response.status, 404);
        assert_eq!(response.message, "Order not found: 7");
    }
}
