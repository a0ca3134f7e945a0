//! # Error Types
//!
//! Domain-specific error types for cart-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  cart-core errors (this file)                                          │
//! │  ├── CoreError        - Rejected business requests                     │
//! │  └── ValidationError  - Malformed order requests                       │
//! │                                                                         │
//! │  cart-db errors (separate crate)                                       │
//! │  ├── DbError          - Database operation failures                    │
//! │  └── OrderError       - What the service surface returns               │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → OrderError → caller               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (IDs, amounts)
//! 3. Errors are enum variants, never String
//! 4. Each variant maps to a stable [`ErrorCode`] and status code

use serde::Serialize;
use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations raised while placing or reading orders.
///
/// None of these are retryable: they describe a request the system refuses,
/// not a transient fault. Whoever raises one aborts the enclosing unit of work.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A requested cart item id does not exist.
    #[error("Cart item not found: {0}")]
    CartItemNotFound(i64),

    /// A cart item points at a product that no longer exists.
    #[error("Product not found: {0}")]
    ProductNotFound(i64),

    /// The caller does not own the cart item or order.
    ///
    /// ## When This Occurs
    /// - Ordering another member's cart line
    /// - Reading another member's order
    #[error("Member {member_id} does not own {entity} {id}")]
    NotOwner {
        entity: &'static str,
        id: i64,
        member_id: i64,
    },

    /// Requested quantity is larger than the product's current stock.
    ///
    /// ## User Workflow
    /// ```text
    /// Cart line (qty: 5)
    ///      │
    ///      ▼
    /// Check stock: available=3
    ///      │
    ///      ▼
    /// QuantityExceedsStock { product_id, available: 3, requested: 5 }
    /// ```
    #[error("Insufficient stock for product {product_id}: available {available}, requested {requested}")]
    QuantityExceedsStock {
        product_id: i64,
        available: i64,
        requested: i64,
    },

    /// Member wants to redeem more points than are currently available.
    #[error("Insufficient points: available {available}, requested {requested}")]
    InsufficientPoints { available: i64, requested: i64 },

    /// Redeemed points exceed the order's total price.
    #[error("Cannot redeem {point} points on an order totalling {total_price}")]
    RedemptionExceedsTotal { point: i64, total_price: i64 },

    /// Client-declared total disagrees with the sum of the order lines.
    #[error("Declared total {declared} does not match computed total {computed}")]
    TotalPriceMismatch { declared: i64, computed: i64 },

    /// Σ price × quantity does not fit in an amount.
    #[error("Order total exceeds the largest representable amount")]
    TotalPriceOverflow,

    /// Order id does not exist.
    #[error("Order not found: {0}")]
    OrderNotFound(i64),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Returns the machine-readable code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::CartItemNotFound(_) => ErrorCode::CartItemNotFound,
            CoreError::ProductNotFound(_) => ErrorCode::ProductNotFound,
            CoreError::NotOwner { .. } => ErrorCode::NotOwner,
            CoreError::QuantityExceedsStock { .. } => ErrorCode::QuantityExceedsStock,
            CoreError::InsufficientPoints { .. } => ErrorCode::InsufficientPoints,
            CoreError::RedemptionExceedsTotal { .. } => ErrorCode::RedemptionExceedsTotal,
            CoreError::TotalPriceMismatch { .. } | CoreError::TotalPriceOverflow => {
                ErrorCode::TotalPriceMismatch
            }
            CoreError::OrderNotFound(_) => ErrorCode::OrderNotFound,
            CoreError::Validation(_) => ErrorCode::ValidationError,
        }
    }

    /// Shorthand for [`ErrorCode::status_code`].
    pub fn status_code(&self) -> u16 {
        self.code().status_code()
    }
}

// =============================================================================
// Error Code
// =============================================================================

/// Stable error codes handed to the presentation layer.
///
/// ## Serialization
/// ```json
/// "INSUFFICIENT_POINTS"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Cart item missing (404)
    CartItemNotFound,

    /// Product missing (404)
    ProductNotFound,

    /// Caller does not own the resource (403)
    NotOwner,

    /// Not enough stock (409)
    QuantityExceedsStock,

    /// Not enough points (409)
    InsufficientPoints,

    /// Points exceed order total (422)
    RedemptionExceedsTotal,

    /// Declared total is wrong (422)
    TotalPriceMismatch,

    /// Order missing (404)
    OrderNotFound,

    /// Malformed request (400)
    ValidationError,

    /// Storage failed (500)
    DatabaseError,

    /// Placement deadline elapsed (503)
    Timeout,
}

impl ErrorCode {
    /// HTTP-style status code for this error.
    pub const fn status_code(self) -> u16 {
        match self {
            ErrorCode::CartItemNotFound | ErrorCode::ProductNotFound | ErrorCode::OrderNotFound => {
                404
            }
            ErrorCode::NotOwner => 403,
            ErrorCode::QuantityExceedsStock | ErrorCode::InsufficientPoints => 409,
            ErrorCode::RedemptionExceedsTotal | ErrorCode::TotalPriceMismatch => 422,
            ErrorCode::ValidationError => 400,
            ErrorCode::DatabaseError => 500,
            ErrorCode::Timeout => 503,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any I/O when an order request is malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Collection has too many entries.
    #[error("{field} must have at most {max} entries")]
    TooMany { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Duplicate value (e.g., the same cart item twice).
    #[error("{field} '{value}' appears more than once")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::QuantityExceedsStock {
            product_id: 7,
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for product 7: available 3, requested 5"
        );

        let err = CoreError::NotOwner {
            entity: "order",
            id: 4,
            member_id: 2,
        };
        assert_eq!(err.to_string(), "Member 2 does not own order 4");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(CoreError::OrderNotFound(1).status_code(), 404);
        assert_eq!(
            CoreError::InsufficientPoints {
                available: 0,
                requested: 1
            }
            .status_code(),
            409
        );
        assert_eq!(
            CoreError::TotalPriceMismatch {
                declared: 1,
                computed: 2
            }
            .status_code(),
            422
        );
    }

    #[test]
    fn test_error_code_serialization() {
        let json = serde_json::to_string(&ErrorCode::RedemptionExceedsTotal).unwrap();
        assert_eq!(json, "\"REDEMPTION_EXCEEDS_TOTAL\"");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "cartItemIds".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
        assert_eq!(core_err.code(), ErrorCode::ValidationError);
    }
}
