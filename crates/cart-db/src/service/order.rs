//! # Order Placement
//!
//! Turns a member's cart lines into an order inside one unit of work.
//!
//! ## Placement Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        place_order(member, request)                     │
//! │                                                                         │
//! │  now = Utc::now()            (captured once, used for every step)       │
//! │       │                                                                 │
//! │  validate request shape      ──► ValidationError                        │
//! │  point > total?              ──► RedemptionExceedsTotal                 │
//! │       │                                                                 │
//! │  BEGIN ─────────────────────────────────────────────────────────────┐   │
//! │  │ 1. redeem points          ──► InsufficientPoints / Conflict      │   │
//! │  │ 2. accrue + store point   (point_id)                             │   │
//! │  │ 3. load + validate lines  ──► CartItemNotFound / ProductNotFound │   │
//! │  │                               / NotOwner / QuantityExceedsStock  │   │
//! │  │ 4. decrement stock        ──► Conflict                           │   │
//! │  │ 5. delete cart lines      ──► Conflict                           │   │
//! │  │ 6. build order, checksum  ──► TotalPriceMismatch                 │   │
//! │  │ 7. store order + items                                           │   │
//! │  COMMIT ◄───────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │  order_id                                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Any `?` inside the box drops the unit of work, which rolls back every
//! write made so far. A configured deadline cancels the whole future the
//! same way.

use chrono::{DateTime, Utc};
use std::time::Duration;
use tracing::{debug, info, warn};

use cart_core::cart::validate_cart_line;
use cart_core::validation::validate_order_request;
use cart_core::{
    Member, NewOrder, OrderPoint, OrderRequest, PointPolicy, ValidatedCartItem,
};

use super::error::{OrderError, OrderResult};
use crate::config::{AppConfig, ConfigError};
use crate::error::DbError;
use crate::pool::Database;
use crate::unit_of_work::UnitOfWork;

/// Places orders.
///
/// ## Usage
/// ```rust,ignore
/// let service = OrderService::new(db, PointPolicy::default())
///     .with_timeout(Duration::from_secs(5));
///
/// let request = OrderRequest { cart_item_ids: vec![1, 2], total_price: 65_000, point: 1_000 };
/// let order_id = service.place_order(&member, &request).await?;
/// ```
#[derive(Debug, Clone)]
pub struct OrderService {
    db: Database,
    points: OrderPoint,
    timeout: Option<Duration>,
}

impl OrderService {
    /// Creates a service without a placement deadline.
    pub fn new(db: Database, policy: PointPolicy) -> Self {
        OrderService {
            db,
            points: OrderPoint::new(policy),
            timeout: None,
        }
    }

    /// Creates a service with the policy and deadline from `config`.
    pub fn from_config(db: Database, config: &AppConfig) -> Result<Self, ConfigError> {
        Ok(OrderService {
            db,
            points: OrderPoint::new(config.point_policy()?),
            timeout: config.order_timeout,
        })
    }

    /// Cancels placements that take longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Places an order timestamped now.
    pub async fn place_order(&self, member: &Member, request: &OrderRequest) -> OrderResult<i64> {
        self.place_order_at(member, request, Utc::now()).await
    }

    /// Places an order timestamped `now`.
    ///
    /// `now` decides which points are still available, when earned points
    /// expire, and the order's `created_at`.
    pub async fn place_order_at(
        &self,
        member: &Member,
        request: &OrderRequest,
        now: DateTime<Utc>,
    ) -> OrderResult<i64> {
        debug!(
            member_id = member.id,
            lines = request.cart_item_ids.len(),
            total_price = request.total_price,
            point = request.point,
            "place_order"
        );

        let result = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.place(member, request, now))
                .await
                .unwrap_or(Err(OrderError::TimedOut(limit))),
            None => self.place(member, request, now).await,
        };

        match &result {
            Ok(order_id) => info!(
                order_id = *order_id,
                member_id = member.id,
                total_price = request.total_price,
                used_point = request.point,
                "Order placed"
            ),
            Err(e) => warn!(
                member_id = member.id,
                code = ?e.code(),
                retryable = e.is_retryable(),
                error = %e,
                "Order rejected"
            ),
        }

        result
    }

    async fn place(
        &self,
        member: &Member,
        request: &OrderRequest,
        now: DateTime<Utc>,
    ) -> OrderResult<i64> {
        validate_order_request(request)?;
        self.points
            .check_redemption(request.point, request.total_price)?;

        let mut uow = self.db.begin().await?;

        self.redeem_points(&mut uow, member, request.point, now)
            .await?;

        let earned = self
            .points
            .accrue(member, request.point, request.total_price, now)?;
        let point_id = uow.points().create(&earned).await?;

        let validated = load_and_validate(&mut uow, member, &request.cart_item_ids).await?;
        apply_decrements(&mut uow, &validated).await?;
        delete_cart_items(&mut uow, &request.cart_item_ids).await?;

        let order = NewOrder::build(member, request.point, earned.earned_point, now, &validated);
        order.check_total_price(request.total_price)?;

        let order_id = uow.orders().create(&order, point_id).await?;
        for item in order.items() {
            uow.orders().create_item(order_id, item).await?;
        }

        uow.commit().await?;
        Ok(order_id)
    }

    /// Lowers the balances of the member's available points by `requested`.
    async fn redeem_points(
        &self,
        uow: &mut UnitOfWork,
        member: &Member,
        requested: i64,
        now: DateTime<Utc>,
    ) -> OrderResult<()> {
        let available = uow.points().find_available_by_member(member.id, now).await?;
        let deductions = self.points.consume(requested, &available, now)?;

        for deduction in &deductions {
            uow.points()
                .update_left_point(
                    deduction.point.id,
                    deduction.previous_left(),
                    deduction.point.left_point,
                )
                .await?;
        }

        debug!(
            member_id = member.id,
            requested,
            records = deductions.len(),
            "Points redeemed"
        );
        Ok(())
    }
}

// =============================================================================
// Placement Steps
// =============================================================================

/// Loads and checks every line in input order; the first failing id wins.
async fn load_and_validate(
    uow: &mut UnitOfWork,
    member: &Member,
    cart_item_ids: &[i64],
) -> OrderResult<Vec<ValidatedCartItem>> {
    let mut validated = Vec::with_capacity(cart_item_ids.len());

    for &id in cart_item_ids {
        let line = uow.cart_items().find_line(id).await?;
        validated.push(validate_cart_line(member, id, line)?);
    }

    Ok(validated)
}

/// Takes each line's quantity out of its product's stock.
async fn apply_decrements(uow: &mut UnitOfWork, validated: &[ValidatedCartItem]) -> OrderResult<()> {
    for line in validated {
        let change = line.decrement();
        uow.products()
            .update_stock(change.product_id, change.expected_stock, change.new_stock)
            .await?;
    }
    Ok(())
}

/// Removes the checked-out lines. All of them must still be there.
async fn delete_cart_items(uow: &mut UnitOfWork, cart_item_ids: &[i64]) -> OrderResult<()> {
    let deleted = uow.cart_items().delete_by_ids(cart_item_ids).await?;

    if deleted != cart_item_ids.len() as u64 {
        return Err(DbError::conflict("CartItem", format!("{cart_item_ids:?}")).into());
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
