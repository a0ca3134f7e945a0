//! # Point Repository
//!
//! Database operations for loyalty point records.
//!
//! ## Balance Writes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Redeeming From a Point Record                        │
//! │                                                                         │
//! │  find_available_by_member(member, now)                                 │
//! │       │  left_point > 0 AND expired_at > now                           │
//! │       │  ORDER BY expired_at, id                                       │
//! │       ▼                                                                 │
//! │  OrderPoint::consume() decides the deductions                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  UPDATE point SET left_point = new                                     │
//! │   WHERE id = ? AND left_point = previous                               │
//! │       │                                                                 │
//! │       └── 0 rows ──► DbError::Conflict (balance spent elsewhere)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! Point rows are never deleted; an exhausted record keeps `left_point = 0`.

use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;
use tracing::debug;

use super::sql_timestamp;
use crate::error::{DbError, DbResult};
use cart_core::{NewPoint, Point};

/// Repository for point database operations.
#[derive(Debug)]
pub struct PointRepository<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> PointRepository<'c> {
    /// Creates a new PointRepository on `conn`.
    pub fn new(conn: &'c mut SqliteConnection) -> Self {
        PointRepository { conn }
    }

    /// Stores a point record and returns its id.
    pub async fn create(&mut self, point: &NewPoint) -> DbResult<i64> {
        debug!(
            member_id = point.member_id,
            earned_point = point.earned_point,
            "Creating point record"
        );

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO point (member_id, earned_point, left_point, created_at, expired_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            RETURNING id
            "#,
        )
        .bind(point.member_id)
        .bind(point.earned_point)
        .bind(point.left_point)
        .bind(sql_timestamp(point.created_at))
        .bind(sql_timestamp(point.expired_at))
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(id)
    }

    /// Gets a point record by ID.
    pub async fn find_by_id(&mut self, id: i64) -> DbResult<Option<Point>> {
        let point = sqlx::query_as::<_, Point>(
            r#"
            SELECT id, member_id, earned_point, left_point, created_at, expired_at
            FROM point
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(point)
    }

    /// Records the member can redeem from at `as_of`, in consumption order.
    pub async fn find_available_by_member(
        &mut self,
        member_id: i64,
        as_of: DateTime<Utc>,
    ) -> DbResult<Vec<Point>> {
        let points = sqlx::query_as::<_, Point>(
            r#"
            SELECT id, member_id, earned_point, left_point, created_at, expired_at
            FROM point
            WHERE member_id = ?1 AND left_point > 0 AND expired_at > ?2
            ORDER BY expired_at ASC, id ASC
            "#,
        )
        .bind(member_id)
        .bind(sql_timestamp(as_of))
        .fetch_all(&mut *self.conn)
        .await?;

        debug!(member_id, count = points.len(), "Loaded available points");
        Ok(points)
    }

    /// Every record the member has, exhausted and expired ones included.
    pub async fn find_all_by_member(&mut self, member_id: i64) -> DbResult<Vec<Point>> {
        let points = sqlx::query_as::<_, Point>(
            r#"
            SELECT id, member_id, earned_point, left_point, created_at, expired_at
            FROM point
            WHERE member_id = ?1
            ORDER BY id ASC
            "#,
        )
        .bind(member_id)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(points)
    }

    /// Sets `left_point` to `new_left` if it still equals `expected_left`.
    pub async fn update_left_point(
        &mut self,
        id: i64,
        expected_left: i64,
        new_left: i64,
    ) -> DbResult<()> {
        debug!(id, expected_left, new_left, "Updating point balance");

        let result =
            sqlx::query("UPDATE point SET left_point = ?1 WHERE id = ?2 AND left_point = ?3")
                .bind(new_left)
                .bind(id)
                .bind(expected_left)
                .execute(&mut *self.conn)
                .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::conflict("Point", id));
        }

        Ok(())
    }
}
