//! # Order Queries
//!
//! Read side: a member's orders as [`OrderView`]s.
//!
//! Reads run on a plain pooled connection. Orders and their items are
//! immutable once committed, so no transaction is needed to see a
//! consistent order.

use tracing::debug;

use cart_core::{CoreError, Member, OrderView};

use super::error::OrderResult;
use crate::pool::Database;
use crate::repository::order::OrderRepository;

/// Reads orders back for their owner.
#[derive(Debug, Clone)]
pub struct OrderQueryService {
    db: Database,
}

impl OrderQueryService {
    pub fn new(db: Database) -> Self {
        OrderQueryService { db }
    }

    /// One order with its items.
    ///
    /// ## Errors
    /// - `OrderNotFound` when no order has `order_id`
    /// - `NotOwner` when the order belongs to another member
    pub async fn get_order(&self, member: &Member, order_id: i64) -> OrderResult<OrderView> {
        debug!(member_id = member.id, order_id, "get_order");

        let mut conn = self.db.acquire().await?;
        let mut orders = OrderRepository::new(&mut *conn);

        let order = orders
            .find_by_id(order_id)
            .await?
            .ok_or(CoreError::OrderNotFound(order_id))?;

        if !order.is_owned_by(member) {
            return Err(CoreError::NotOwner {
                entity: "order",
                id: order_id,
                member_id: member.id,
            }
            .into());
        }

        let items = orders.find_items_by_order(order.id).await?;
        Ok(OrderView::assemble(&order, items)?)
    }

    /// All of the member's orders, newest first.
    pub async fn list_orders(&self, member: &Member) -> OrderResult<Vec<OrderView>> {
        let mut conn = self.db.acquire().await?;
        let mut orders = OrderRepository::new(&mut *conn);

        let headers = orders.find_all_by_member(member.id).await?;
        let mut views = Vec::with_capacity(headers.len());
        for order in &headers {
            let items = orders.find_items_by_order(order.id).await?;
            views.push(OrderView::assemble(order, items)?);
        }

        debug!(member_id = member.id, count = views.len(), "list_orders");
        Ok(views)
    }
}
