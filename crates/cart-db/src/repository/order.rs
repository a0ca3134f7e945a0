//! # Order Repository
//!
//! Database operations for orders and their items.
//!
//! ## Storage Shape
//! ```text
//! orders (id, member_id, point_id, used_point, earned_point, created_at)
//!    │
//!    └──< order_item (order_id, product_id, name, price, image_url, quantity)
//! ```
//! Orders are append-only: there is no update or delete here. The total is
//! not stored; readers derive it from the items.

use sqlx::SqliteConnection;
use tracing::debug;

use super::sql_timestamp;
use crate::error::DbResult;
use cart_core::{NewOrder, Order, OrderItem};

/// Repository for order database operations.
#[derive(Debug)]
pub struct OrderRepository<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> OrderRepository<'c> {
    /// Creates a new OrderRepository on `conn`.
    pub fn new(conn: &'c mut SqliteConnection) -> Self {
        OrderRepository { conn }
    }

    /// Stores the order header and returns its id. Items are written
    /// separately with [`Self::create_item`].
    pub async fn create(&mut self, order: &NewOrder, point_id: i64) -> DbResult<i64> {
        debug!(
            member_id = order.member_id(),
            point_id,
            items = order.items().len(),
            "Creating order"
        );

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO orders (member_id, point_id, used_point, earned_point, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            RETURNING id
            "#,
        )
        .bind(order.member_id())
        .bind(point_id)
        .bind(order.used_point())
        .bind(order.earned_point())
        .bind(sql_timestamp(order.created_at()))
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(id)
    }

    /// Stores one item of `order_id`.
    pub async fn create_item(&mut self, order_id: i64, item: &OrderItem) -> DbResult<i64> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO order_item (order_id, product_id, name, price, image_url, quantity)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            RETURNING id
            "#,
        )
        .bind(order_id)
        .bind(item.product_id)
        .bind(&item.name)
        .bind(item.price)
        .bind(&item.image_url)
        .bind(item.quantity)
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(id)
    }

    /// Gets an order header by ID.
    pub async fn find_by_id(&mut self, id: i64) -> DbResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, member_id, point_id, used_point, earned_point, created_at
            FROM orders
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(order)
    }

    /// A member's orders, newest first.
    pub async fn find_all_by_member(&mut self, member_id: i64) -> DbResult<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, member_id, point_id, used_point, earned_point, created_at
            FROM orders
            WHERE member_id = ?1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(member_id)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(orders)
    }

    /// Items of an order in the order they were written.
    pub async fn find_items_by_order(&mut self, order_id: i64) -> DbResult<Vec<OrderItem>> {
        let items = sqlx::query_as::<_, OrderItem>(
            r#"
            SELECT product_id, name, price, image_url, quantity
            FROM order_item
            WHERE order_id = ?1
            ORDER BY id ASC
            "#,
        )
        .bind(order_id)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};
    use cart_core::{CartItem, Member, NewOrder, NewPoint, Product, ValidatedCartItem};
    use chrono::{DateTime, Duration, Utc};

    fn line(product_id: i64, price: i64, quantity: i64) -> ValidatedCartItem {
        ValidatedCartItem {
            cart_item: CartItem {
                id: product_id,
                member_id: 1,
                product_id,
                quantity,
            },
            product: Product {
                id: product_id,
                name: format!("product-{product_id}"),
                price,
                image_url: format!("https://img.example/{product_id}.png"),
                stock: 10,
            },
        }
    }

    async fn member_with_point(db: &Database, now: DateTime<Utc>) -> (Member, i64) {
        let mut uow = db.begin().await.unwrap();
        let member = uow.members().insert("hardy@example.com").await.unwrap();
        let point_id = uow
            .points()
            .create(&NewPoint {
                member_id: member.id,
                earned_point: 0,
                left_point: 0,
                created_at: now,
                expired_at: now + Duration::days(30),
            })
            .await
            .unwrap();
        uow.commit().await.unwrap();
        (member, point_id)
    }

    #[tokio::test]
    async fn test_create_and_read_back() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let now = Utc::now();
        let (member, point_id) = member_with_point(&db, now).await;

        let order = NewOrder::build(
            &member,
            1000,
            6500,
            now,
            &[line(20, 20_000, 3), line(10, 5_000, 1)],
        );

        let mut uow = db.begin().await.unwrap();
        let order_id = uow.orders().create(&order, point_id).await.unwrap();
        for item in order.items() {
            uow.orders().create_item(order_id, item).await.unwrap();
        }
        uow.commit().await.unwrap();

        let mut uow = db.begin().await.unwrap();
        let stored = uow.orders().find_by_id(order_id).await.unwrap().unwrap();
        assert_eq!(stored.member_id, member.id);
        assert_eq!(stored.point_id, point_id);
        assert_eq!(stored.used_point, 1000);
        assert_eq!(stored.earned_point, 6500);
        assert_eq!(stored.created_at, now);

        let items = uow.orders().find_items_by_order(order_id).await.unwrap();
        assert_eq!(items, order.items().to_vec());
    }

    #[tokio::test]
    async fn test_find_all_newest_first() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let now = Utc::now();
        let (member, point_id) = member_with_point(&db, now).await;

        let mut uow = db.begin().await.unwrap();
        let older = NewOrder::build(&member, 0, 0, now - Duration::hours(1), &[line(1, 100, 1)]);
        let newer = NewOrder::build(&member, 0, 0, now, &[line(1, 100, 1)]);
        let same_time = NewOrder::build(&member, 0, 0, now, &[line(1, 100, 1)]);

        let older_id = uow.orders().create(&older, point_id).await.unwrap();
        let newer_id = uow.orders().create(&newer, point_id).await.unwrap();
        let same_id = uow.orders().create(&same_time, point_id).await.unwrap();

        let ids: Vec<i64> = uow
            .orders()
            .find_all_by_member(member.id)
            .await
            .unwrap()
            .iter()
            .map(|o| o.id)
            .collect();
        assert_eq!(ids, vec![same_id, newer_id, older_id]);

        assert!(uow.orders().find_all_by_member(member.id + 1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_order_requires_point_record() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let now = Utc::now();
        let (member, _) = member_with_point(&db, now).await;

        let mut uow = db.begin().await.unwrap();
        let order = NewOrder::build(&member, 0, 0, now, &[line(1, 100, 1)]);
        let err = uow.orders().create(&order, 9999).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }
}
