//! # Validation Module
//!
//! Input validation for order requests and policy settings.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Presentation (outside this workspace)                        │
//! │  └── Deserialization, authentication                                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE - request shape, before any I/O                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Business rules (point ledger, cart lines, checksum)          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 4: Database (CHECK, FOREIGN KEY, compare-and-set updates)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use cart_core::validation::validate_order_request;
//! use cart_core::OrderRequest;
//!
//! let request = OrderRequest { cart_item_ids: vec![1, 2], total_price: 65_000, point: 0 };
//! assert!(validate_order_request(&request).is_ok());
//! ```

use std::collections::HashSet;

use crate::error::ValidationError;
use crate::types::OrderRequest;
use crate::MAX_ORDER_LINES;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Order Request
// =============================================================================

/// Validates the shape of an order request.
///
/// ## Rules
/// - `cartItemIds` is non-empty, has no duplicates, at most MAX_ORDER_LINES
/// - `totalPrice` and `point` are not negative
pub fn validate_order_request(request: &OrderRequest) -> ValidationResult<()> {
    validate_cart_item_ids(&request.cart_item_ids)?;
    validate_amount("totalPrice", request.total_price)?;
    validate_amount("point", request.point)?;
    Ok(())
}

/// Validates the list of cart lines to check out.
///
/// A repeated id would decrement stock twice for one cart line.
pub fn validate_cart_item_ids(ids: &[i64]) -> ValidationResult<()> {
    if ids.is_empty() {
        return Err(ValidationError::Required {
            field: "cartItemIds".to_string(),
        });
    }

    if ids.len() > MAX_ORDER_LINES {
        return Err(ValidationError::TooMany {
            field: "cartItemIds".to_string(),
            max: MAX_ORDER_LINES,
        });
    }

    let mut seen = HashSet::with_capacity(ids.len());
    for id in ids {
        if !seen.insert(*id) {
            return Err(ValidationError::Duplicate {
                field: "cartItemIds".to_string(),
                value: id.to_string(),
            });
        }
    }

    Ok(())
}

/// Validates a price or point amount.
pub fn validate_amount(field: &str, amount: i64) -> ValidationResult<()> {
    if amount < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Policy Settings
// =============================================================================

/// Validates an accrual rate in basis points (0% to 100%).
pub fn validate_point_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10_000 {
        return Err(ValidationError::OutOfRange {
            field: "point rate".to_string(),
            min: 0,
            max: 10_000,
        });
    }
    Ok(())
}

/// Validates how long earned points stay redeemable.
pub fn validate_point_validity_days(days: i64) -> ValidationResult<()> {
    if days <= 0 || days > 3650 {
        return Err(ValidationError::OutOfRange {
            field: "point validity days".to_string(),
            min: 1,
            max: 3650,
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn request(ids: Vec<i64>, total_price: i64, point: i64) -> OrderRequest {
        OrderRequest {
            cart_item_ids: ids,
            total_price,
            point,
        }
    }

    #[test]
    fn test_valid_request() {
        assert!(validate_order_request(&request(vec![1, 2], 65_000, 1000)).is_ok());
        assert!(validate_order_request(&request(vec![1], 0, 0)).is_ok());
    }

    #[test]
    fn test_empty_cart_item_ids() {
        let err = validate_order_request(&request(vec![], 100, 0)).unwrap_err();
        assert_eq!(err.to_string(), "cartItemIds is required");
    }

    #[test]
    fn test_duplicate_cart_item_ids() {
        let err = validate_order_request(&request(vec![3, 4, 3], 100, 0)).unwrap_err();
        assert_eq!(
            err,
            ValidationError::Duplicate {
                field: "cartItemIds".to_string(),
                value: "3".to_string()
            }
        );
    }

    #[test]
    fn test_too_many_lines() {
        let ids: Vec<i64> = (0..=MAX_ORDER_LINES as i64).collect();
        assert!(matches!(
            validate_cart_item_ids(&ids),
            Err(ValidationError::TooMany { .. })
        ));
    }

    #[test]
    fn test_negative_amounts() {
        assert!(validate_order_request(&request(vec![1], -1, 0)).is_err());
        assert!(validate_order_request(&request(vec![1], 100, -5)).is_err());
    }

    #[test]
    fn test_policy_settings() {
        assert!(validate_point_rate_bps(0).is_ok());
        assert!(validate_point_rate_bps(10_000).is_ok());
        assert!(validate_point_rate_bps(10_001).is_err());

        assert!(validate_point_validity_days(30).is_ok());
        assert!(validate_point_validity_days(0).is_err());
    }
}
