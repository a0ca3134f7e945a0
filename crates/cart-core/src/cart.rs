//! # Cart Line Validation
//!
//! Checks that a cart line may be checked out by the ordering member.
//!
//! ## Check Order
//! ```text
//! cart_item_id
//!      │
//!      ├── line missing?           ──► CartItemNotFound
//!      ├── product missing?        ──► ProductNotFound
//!      ├── other member's line?    ──► NotOwner
//!      ├── quantity > stock?       ──► QuantityExceedsStock
//!      ▼
//! ValidatedCartItem
//! ```
//! The order is fixed so the same bad request always reports the same error.

use crate::error::{CoreError, CoreResult};
use crate::types::{CartItem, Member, Product};

/// A cart line as loaded from the store, with its product if it still exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub cart_item: CartItem,
    pub product: Option<Product>,
}

/// A cart line that passed every check, paired with the product it was
/// checked against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedCartItem {
    pub cart_item: CartItem,
    pub product: Product,
}

/// Stock change for one product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockDecrement {
    pub product_id: i64,

    /// Stock seen at validation time; the write only applies if it still holds.
    pub expected_stock: i64,
    pub new_stock: i64,
}

impl ValidatedCartItem {
    /// stock − quantity for this line's product.
    pub fn decrement(&self) -> StockDecrement {
        StockDecrement {
            product_id: self.product.id,
            expected_stock: self.product.stock,
            new_stock: self.product.stock - self.cart_item.quantity,
        }
    }
}

/// Validates a single cart line for `member`.
///
/// `line` is `None` when no cart item with `cart_item_id` exists.
pub fn validate_cart_line(
    member: &Member,
    cart_item_id: i64,
    line: Option<CartLine>,
) -> CoreResult<ValidatedCartItem> {
    let CartLine { cart_item, product } = line.ok_or(CoreError::CartItemNotFound(cart_item_id))?;

    let product = product.ok_or(CoreError::ProductNotFound(cart_item.product_id))?;

    if !cart_item.is_owned_by(member) {
        return Err(CoreError::NotOwner {
            entity: "cart item",
            id: cart_item.id,
            member_id: member.id,
        });
    }

    if !product.has_stock_for(cart_item.quantity) {
        return Err(CoreError::QuantityExceedsStock {
            product_id: product.id,
            available: product.stock,
            requested: cart_item.quantity,
        });
    }

    Ok(ValidatedCartItem { cart_item, product })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn hardy() -> Member {
        Member {
            id: 1,
            email: "hardy@example.com".to_string(),
        }
    }

    fn line(member_id: i64, quantity: i64, stock: Option<i64>) -> CartLine {
        CartLine {
            cart_item: CartItem {
                id: 10,
                member_id,
                product_id: 5,
                quantity,
            },
            product: stock.map(|stock| Product {
                id: 5,
                name: "Pizza".to_string(),
                price: 20_000,
                image_url: String::new(),
                stock,
            }),
        }
    }

    #[test]
    fn test_valid_line() {
        let validated = validate_cart_line(&hardy(), 10, Some(line(1, 3, Some(3)))).unwrap();
        assert_eq!(validated.cart_item.id, 10);

        let decrement = validated.decrement();
        assert_eq!(decrement.product_id, 5);
        assert_eq!(decrement.expected_stock, 3);
        assert_eq!(decrement.new_stock, 0);
    }

    #[test]
    fn test_missing_line() {
        let err = validate_cart_line(&hardy(), 8000, None).unwrap_err();
        assert_eq!(err, CoreError::CartItemNotFound(8000));
    }

    #[test]
    fn test_dangling_product_reported_before_ownership() {
        let err = validate_cart_line(&hardy(), 10, Some(line(2, 3, None))).unwrap_err();
        assert_eq!(err, CoreError::ProductNotFound(5));
    }

    #[test]
    fn test_ownership_reported_before_stock() {
        let err = validate_cart_line(&hardy(), 10, Some(line(2, 30, Some(3)))).unwrap_err();
        assert!(matches!(err, CoreError::NotOwner { id: 10, member_id: 1, .. }));
    }

    #[test]
    fn test_quantity_over_stock() {
        let err = validate_cart_line(&hardy(), 10, Some(line(1, 4, Some(3)))).unwrap_err();
        assert_eq!(
            err,
            CoreError::QuantityExceedsStock {
                product_id: 5,
                available: 3,
                requested: 4
            }
        );
    }
}
