//! # Order Assembly
//!
//! Builds the immutable order aggregate from validated cart lines and checks
//! the client's declared total against it.
//!
//! ## Checksum, Not Pricing
//! ```text
//! validated lines ──► OrderItem snapshots ──► Σ price × quantity
//!                                                   │
//!                          OrderRequest.total_price ┴─► equal? else TotalPriceMismatch
//! ```
//! The server never decides what the customer pays here; it only refuses
//! orders where client and server disagree about the cart.

use chrono::{DateTime, Utc};

use crate::cart::ValidatedCartItem;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Member, OrderItem};

/// An order that has not been stored yet.
///
/// All lines are snapshotted in [`NewOrder::build`]; there is no way to add or
/// change a line afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    member_id: i64,
    used_point: i64,
    earned_point: i64,
    created_at: DateTime<Utc>,
    items: Vec<OrderItem>,
}

impl NewOrder {
    /// Snapshots one [`OrderItem`] per validated line, preserving input order.
    pub fn build(
        member: &Member,
        used_point: i64,
        earned_point: i64,
        created_at: DateTime<Utc>,
        validated: &[ValidatedCartItem],
    ) -> Self {
        let items = validated
            .iter()
            .map(|line| OrderItem::snapshot(&line.product, line.cart_item.quantity))
            .collect();

        NewOrder {
            member_id: member.id,
            used_point,
            earned_point,
            created_at,
            items,
        }
    }

    /// Σ price × quantity over all lines.
    ///
    /// Fails with `TotalPriceOverflow` when a line or the sum does not fit.
    pub fn total_price(&self) -> CoreResult<Money> {
        Money::checked_sum(self.items.iter().map(OrderItem::line_total))
            .ok_or(CoreError::TotalPriceOverflow)
    }

    /// Fails with `TotalPriceMismatch` unless `declared` equals [`Self::total_price`].
    pub fn check_total_price(&self, declared: i64) -> CoreResult<()> {
        let computed = self.total_price()?.minor();
        if computed != declared {
            return Err(CoreError::TotalPriceMismatch { declared, computed });
        }
        Ok(())
    }

    pub fn member_id(&self) -> i64 {
        self.member_id
    }

    pub fn used_point(&self) -> i64 {
        self.used_point
    }

    pub fn earned_point(&self) -> i64 {
        self.earned_point
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CartItem, Product};

    fn validated(cart_item_id: i64, product_id: i64, price: i64, quantity: i64) -> ValidatedCartItem {
        ValidatedCartItem {
            cart_item: CartItem {
                id: cart_item_id,
                member_id: 1,
                product_id,
                quantity,
            },
            product: Product {
                id: product_id,
                name: format!("product-{product_id}"),
                price,
                image_url: String::new(),
                stock: 10,
            },
        }
    }

    fn member() -> Member {
        Member {
            id: 1,
            email: "hardy@example.com".to_string(),
        }
    }

    #[test]
    fn test_build_preserves_line_order() {
        let lines = vec![validated(1, 20, 20_000, 3), validated(2, 10, 5_000, 1)];
        let order = NewOrder::build(&member(), 1000, 6500, Utc::now(), &lines);

        let product_ids: Vec<i64> = order.items().iter().map(|i| i.product_id).collect();
        assert_eq!(product_ids, vec![20, 10]);
        assert_eq!(order.member_id(), 1);
        assert_eq!(order.used_point(), 1000);
        assert_eq!(order.earned_point(), 6500);
        assert_eq!(order.total_price().unwrap().minor(), 65_000);
    }

    #[test]
    fn test_checksum_matches() {
        let lines = vec![validated(1, 20, 20_000, 3), validated(2, 10, 5_000, 1)];
        let order = NewOrder::build(&member(), 0, 0, Utc::now(), &lines);

        assert!(order.check_total_price(65_000).is_ok());
    }

    #[test]
    fn test_checksum_mismatch() {
        let lines = vec![validated(1, 20, 20_000, 3)];
        let order = NewOrder::build(&member(), 0, 0, Utc::now(), &lines);

        let err = order.check_total_price(63_000).unwrap_err();
        assert_eq!(
            err,
            CoreError::TotalPriceMismatch {
                declared: 63_000,
                computed: 60_000
            }
        );
    }

    #[test]
    fn test_checksum_overflow_is_rejected() {
        // One line overflows on its own
        let lines = vec![validated(1, 20, 1 << 62, 2)];
        let order = NewOrder::build(&member(), 0, 0, Utc::now(), &lines);
        assert_eq!(order.total_price(), Err(CoreError::TotalPriceOverflow));
        assert_eq!(order.check_total_price(0), Err(CoreError::TotalPriceOverflow));

        // Every line fits, the sum does not
        let lines = vec![
            validated(1, 20, i64::MAX / 2, 1),
            validated(2, 10, i64::MAX / 2, 1),
            validated(3, 30, 2, 1),
        ];
        let order = NewOrder::build(&member(), 0, 0, Utc::now(), &lines);
        assert_eq!(
            order.check_total_price(i64::MAX).unwrap_err().code(),
            crate::error::ErrorCode::TotalPriceMismatch
        );
    }
}
