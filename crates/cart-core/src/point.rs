//! # Point Ledger
//!
//! Redemption and accrual math for loyalty points. Pure policy, no I/O.
//!
//! ## Order Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Points During Checkout                               │
//! │                                                                         │
//! │  OrderRequest { point: 1500, total_price: 65000 }                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  check_redemption() ── point > total? ──► RedemptionExceedsTotal       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  consume(1500, available)                                              │
//! │       │   earliest expiry first, ties by id                             │
//! │       │   [A: left 1000, exp Mar] [B: left 800, exp Apr]                │
//! │       │        → A.left = 0             → B.left = 300                  │
//! │       ▼                                                                 │
//! │  accrue(65000) → NewPoint { earned: 6500, expired_at: now + 30d }      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{Member, NewPoint, Point};
use crate::validation::{validate_point_rate_bps, validate_point_validity_days, ValidationResult};
use crate::{DEFAULT_POINT_RATE_BPS, DEFAULT_POINT_VALIDITY_DAYS};

// =============================================================================
// Point Rate
// =============================================================================

/// Accrual rate in basis points (1 bps = 0.01%), at most 10_000.
///
/// 1000 bps = 10% of the order total comes back as points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct PointRate(u32);

impl PointRate {
    /// Creates a rate from basis points.
    ///
    /// Fails with `OutOfRange` above 10_000 bps (100%).
    pub fn from_bps(bps: u32) -> ValidationResult<Self> {
        validate_point_rate_bps(bps)?;
        Ok(PointRate(bps))
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Points earned on `amount`, rounded down.
    ///
    /// ## Example
    /// ```rust
    /// use cart_core::money::Money;
    /// use cart_core::point::PointRate;
    ///
    /// let rate = PointRate::from_bps(1000).unwrap();
    /// assert_eq!(rate.earned_on(Money::from_minor(65_000)), 6_500);
    /// assert_eq!(rate.earned_on(Money::from_minor(9)), 0);
    /// ```
    pub fn earned_on(&self, amount: Money) -> i64 {
        // i128 keeps large totals from overflowing before the division;
        // the quotient never exceeds `amount` because the rate is at most 100%
        (amount.minor() as i128 * self.0 as i128 / 10_000) as i64
    }
}

impl TryFrom<u32> for PointRate {
    type Error = ValidationError;

    fn try_from(bps: u32) -> ValidationResult<Self> {
        PointRate::from_bps(bps)
    }
}

impl From<PointRate> for u32 {
    fn from(rate: PointRate) -> Self {
        rate.0
    }
}

// =============================================================================
// Point Policy
// =============================================================================

/// How many points an order earns and how long they stay valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointPolicy {
    rate: PointRate,
    validity: Duration,
}

impl PointPolicy {
    /// Creates a policy from a rate in basis points and a validity in days.
    ///
    /// ## Errors
    /// `OutOfRange` when the rate is above 10_000 bps or the validity is
    /// outside 1..=3650 days.
    pub fn new(rate_bps: u32, validity_days: i64) -> ValidationResult<Self> {
        let rate = PointRate::from_bps(rate_bps)?;
        validate_point_validity_days(validity_days)?;
        Ok(PointPolicy {
            rate,
            validity: Duration::days(validity_days),
        })
    }

    pub fn rate(&self) -> PointRate {
        self.rate
    }

    pub fn validity(&self) -> Duration {
        self.validity
    }
}

impl Default for PointPolicy {
    fn default() -> Self {
        PointPolicy {
            rate: PointRate(DEFAULT_POINT_RATE_BPS),
            validity: Duration::days(DEFAULT_POINT_VALIDITY_DAYS),
        }
    }
}

// =============================================================================
// Deduction
// =============================================================================

/// A point record after redemption, with how much was taken from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointDeduction {
    /// The record with its new `left_point`.
    pub point: Point,
    pub deducted: i64,
}

impl PointDeduction {
    /// Balance before this redemption. Used as the compare-and-set guard.
    #[inline]
    pub fn previous_left(&self) -> i64 {
        self.point.left_point + self.deducted
    }
}

// =============================================================================
// Order Point
// =============================================================================

/// Stateless calculator deriving redemption and accrual for one order.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderPoint {
    policy: PointPolicy,
}

impl OrderPoint {
    pub fn new(policy: PointPolicy) -> Self {
        OrderPoint { policy }
    }

    pub fn policy(&self) -> PointPolicy {
        self.policy
    }

    /// Rejects redeeming more points than the order costs.
    pub fn check_redemption(&self, used_point: i64, total_price: i64) -> CoreResult<()> {
        if used_point > total_price {
            return Err(CoreError::RedemptionExceedsTotal {
                point: used_point,
                total_price,
            });
        }
        Ok(())
    }

    /// Takes `requested` points out of the member's available records.
    ///
    /// ## Selection Order
    /// Earliest `expired_at` first, ties broken by lowest id. Records that are
    /// not available at `now` are skipped. Only records whose balance actually
    /// changes are returned, so the deductions always sum to `requested`.
    ///
    /// ## Errors
    /// `InsufficientPoints` when the available balance is below `requested`.
    pub fn consume(
        &self,
        requested: i64,
        points: &[Point],
        now: DateTime<Utc>,
    ) -> CoreResult<Vec<PointDeduction>> {
        let mut available: Vec<&Point> = points.iter().filter(|p| p.is_available(now)).collect();
        available.sort_by(|a, b| a.expired_at.cmp(&b.expired_at).then(a.id.cmp(&b.id)));

        let total: i64 = available.iter().map(|p| p.left_point).sum();
        if total < requested {
            return Err(CoreError::InsufficientPoints {
                available: total,
                requested,
            });
        }

        let mut remaining = requested;
        let mut deductions = Vec::new();
        for point in available {
            if remaining <= 0 {
                break;
            }
            let deducted = point.left_point.min(remaining);
            remaining -= deducted;

            let mut updated = point.clone();
            updated.left_point -= deducted;
            deductions.push(PointDeduction {
                point: updated,
                deducted,
            });
        }

        Ok(deductions)
    }

    /// Computes the point record earned by an order.
    ///
    /// ## Errors
    /// `RedemptionExceedsTotal` when `used_point > total_price`; points can
    /// never pay for more than the purchase.
    pub fn accrue(
        &self,
        member: &Member,
        used_point: i64,
        total_price: i64,
        now: DateTime<Utc>,
    ) -> CoreResult<NewPoint> {
        self.check_redemption(used_point, total_price)?;

        let earned = self.policy.rate.earned_on(Money::from_minor(total_price));
        Ok(NewPoint {
            member_id: member.id,
            earned_point: earned,
            left_point: earned,
            created_at: now,
            expired_at: now + self.policy.validity,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn member() -> Member {
        Member {
            id: 1,
            email: "hardy@example.com".to_string(),
        }
    }

    fn point(id: i64, left: i64, now: DateTime<Utc>, expires_in_days: i64) -> Point {
        Point {
            id,
            member_id: 1,
            earned_point: left,
            left_point: left,
            created_at: now - Duration::days(1),
            expired_at: now + Duration::days(expires_in_days),
        }
    }

    #[test]
    fn test_consume_earliest_expiry_first() {
        let now = Utc::now();
        let points = vec![point(1, 1000, now, 20), point(2, 800, now, 5)];

        let deductions = OrderPoint::default().consume(900, &points, now).unwrap();

        assert_eq!(deductions.len(), 2);
        assert_eq!(deductions[0].point.id, 2);
        assert_eq!(deductions[0].point.left_point, 0);
        assert_eq!(deductions[0].previous_left(), 800);
        assert_eq!(deductions[1].point.id, 1);
        assert_eq!(deductions[1].point.left_point, 900);
        assert_eq!(deductions.iter().map(|d| d.deducted).sum::<i64>(), 900);
    }

    #[test]
    fn test_consume_ties_broken_by_id() {
        let now = Utc::now();
        let later = point(7, 500, now, 10);
        let earlier = point(3, 500, now, 10);
        assert_eq!(later.expired_at, earlier.expired_at);

        let deductions = OrderPoint::default()
            .consume(300, &[later, earlier], now)
            .unwrap();

        assert_eq!(deductions.len(), 1);
        assert_eq!(deductions[0].point.id, 3);
        assert_eq!(deductions[0].point.left_point, 200);
    }

    #[test]
    fn test_consume_only_touches_needed_records() {
        let now = Utc::now();
        let points = vec![point(1, 1000, now, 1), point(2, 1000, now, 2)];

        let deductions = OrderPoint::default().consume(1000, &points, now).unwrap();
        assert_eq!(deductions.len(), 1);
        assert_eq!(deductions[0].point.id, 1);

        let none = OrderPoint::default().consume(0, &points, now).unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_consume_skips_unavailable_records() {
        let now = Utc::now();
        let expired = point(1, 5000, now, -1);
        let mut empty = point(2, 0, now, 10);
        empty.earned_point = 100;
        let live = point(3, 1000, now, 10);

        let err = OrderPoint::default()
            .consume(1500, &[expired, empty, live], now)
            .unwrap_err();

        assert_eq!(
            err,
            CoreError::InsufficientPoints {
                available: 1000,
                requested: 1500
            }
        );
    }

    #[test]
    fn test_accrue_sets_amount_and_expiry() {
        let now = Utc::now();
        let order_point = OrderPoint::new(PointPolicy::new(1000, 30).unwrap());

        let new_point = order_point.accrue(&member(), 1000, 65_000, now).unwrap();

        assert_eq!(new_point.member_id, 1);
        assert_eq!(new_point.earned_point, 6_500);
        assert_eq!(new_point.left_point, 6_500);
        assert_eq!(new_point.created_at, now);
        assert_eq!(new_point.expired_at, now + Duration::days(30));
    }

    #[test]
    fn test_accrue_rejects_redemption_over_total() {
        let err = OrderPoint::default()
            .accrue(&member(), 2500, 2000, Utc::now())
            .unwrap_err();

        assert_eq!(
            err,
            CoreError::RedemptionExceedsTotal {
                point: 2500,
                total_price: 2000
            }
        );
    }

    #[test]
    fn test_redeeming_entire_total_is_allowed() {
        assert!(OrderPoint::default().check_redemption(2000, 2000).is_ok());
    }

    #[test]
    fn test_policy_rejects_out_of_range_settings() {
        assert!(PointRate::from_bps(10_000).is_ok());
        assert!(matches!(
            PointRate::from_bps(10_001),
            Err(ValidationError::OutOfRange { max: 10_000, .. })
        ));
        assert!(PointPolicy::new(u32::MAX, 30).is_err());
        assert!(PointPolicy::new(1000, 0).is_err());

        let default = PointPolicy::default();
        assert_eq!(
            PointPolicy::new(default.rate().bps(), default.validity().num_days()),
            Ok(default)
        );
    }

    #[test]
    fn test_full_rate_on_largest_total() {
        let rate = PointRate::from_bps(10_000).unwrap();
        assert_eq!(rate.earned_on(Money::from_minor(i64::MAX)), i64::MAX);
    }

    #[test]
    fn test_rate_deserialization_is_checked() {
        let rate: PointRate = serde_json::from_str("250").unwrap();
        assert_eq!(rate.bps(), 250);
        assert!(serde_json::from_str::<PointRate>("10001").is_err());
    }
}
