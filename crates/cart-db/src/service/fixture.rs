//! Shared setup for service tests: a database with two members and a few
//! products.

use chrono::{DateTime, Duration, Utc};
use std::path::Path;

use crate::pool::{Database, DbConfig};
use crate::repository::cart_item::CartItemRepository;
use crate::repository::order::OrderRepository;
use crate::repository::point::PointRepository;
use crate::repository::product::{NewProduct, ProductRepository};
use crate::service::{OrderQueryService, OrderService};
use cart_core::{Member, NewPoint, Point, PointPolicy, Product};

pub(crate) struct Fixture {
    pub db: Database,
    pub now: DateTime<Utc>,
    pub hardy: Member,
    pub other: Member,

    /// 20_000, stock 10
    pub pizza: Product,

    /// 5_000, stock 5
    pub salad: Product,

    /// 1_000, stock 10
    pub cola: Product,

    /// 5, stock 100
    pub gum: Product,
}

impl Fixture {
    /// In-memory database; one connection, so placements never overlap.
    pub async fn new() -> Self {
        Self::with_db(Database::new(DbConfig::in_memory()).await.unwrap()).await
    }

    /// File database in `dir` with room for concurrent placements.
    pub async fn on_disk(dir: &Path) -> Self {
        let config = DbConfig::new(dir.join("cart.db")).max_connections(8);
        Self::with_db(Database::new(config).await.unwrap()).await
    }

    async fn with_db(db: Database) -> Self {
        let mut uow = db.begin().await.unwrap();

        let hardy = uow.members().insert("hardy@example.com").await.unwrap();
        let other = uow.members().insert("other@example.com").await.unwrap();

        let product = |name: &str, price: i64, stock: i64| NewProduct {
            name: name.to_string(),
            price,
            image_url: format!("https://img.example/{}.png", name.to_lowercase()),
            stock,
        };
        let pizza = uow.products().insert(&product("Pizza", 20_000, 10)).await.unwrap();
        let salad = uow.products().insert(&product("Salad", 5_000, 5)).await.unwrap();
        let cola = uow.products().insert(&product("Cola", 1_000, 10)).await.unwrap();
        let gum = uow.products().insert(&product("Gum", 5, 100)).await.unwrap();

        uow.commit().await.unwrap();

        Fixture {
            db,
            now: Utc::now(),
            hardy,
            other,
            pizza,
            salad,
            cola,
            gum,
        }
    }

    /// Placement with the default policy: 10% back, valid 30 days.
    pub fn service(&self) -> OrderService {
        OrderService::new(self.db.clone(), PointPolicy::default())
    }

    pub fn queries(&self) -> OrderQueryService {
        OrderQueryService::new(self.db.clone())
    }

    pub async fn add_member(&self, email: &str) -> Member {
        let mut uow = self.db.begin().await.unwrap();
        let member = uow.members().insert(email).await.unwrap();
        uow.commit().await.unwrap();
        member
    }

    pub async fn add_product(&self, name: &str, price: i64, stock: i64) -> Product {
        let mut conn = self.db.acquire().await.unwrap();
        ProductRepository::new(&mut *conn)
            .insert(&NewProduct {
                name: name.to_string(),
                price,
                image_url: String::new(),
                stock,
            })
            .await
            .unwrap()
    }

    pub async fn add_to_cart(&self, member_id: i64, product_id: i64, quantity: i64) -> i64 {
        let mut conn = self.db.acquire().await.unwrap();
        CartItemRepository::new(&mut *conn)
            .insert(member_id, product_id, quantity)
            .await
            .unwrap()
            .id
    }

    /// Stores a point record earned a day ago that expires `expires_in` from now.
    pub async fn give_points(&self, member_id: i64, amount: i64, expires_in: Duration) -> i64 {
        let mut conn = self.db.acquire().await.unwrap();
        PointRepository::new(&mut *conn)
            .create(&NewPoint {
                member_id,
                earned_point: amount,
                left_point: amount,
                created_at: self.now - Duration::days(1),
                expired_at: self.now + expires_in,
            })
            .await
            .unwrap()
    }

    pub async fn point(&self, id: i64) -> Point {
        let mut conn = self.db.acquire().await.unwrap();
        PointRepository::new(&mut *conn).find_by_id(id).await.unwrap().unwrap()
    }

    pub async fn all_points(&self, member_id: i64) -> Vec<Point> {
        let mut conn = self.db.acquire().await.unwrap();
        PointRepository::new(&mut *conn)
            .find_all_by_member(member_id)
            .await
            .unwrap()
    }

    /// Sum of `left_point` over the member's records available at `now`.
    pub async fn available_points(&self, member_id: i64) -> i64 {
        let mut conn = self.db.acquire().await.unwrap();
        PointRepository::new(&mut *conn)
            .find_available_by_member(member_id, self.now)
            .await
            .unwrap()
            .iter()
            .map(|p| p.left_point)
            .sum()
    }

    pub async fn stock(&self, product_id: i64) -> i64 {
        let mut conn = self.db.acquire().await.unwrap();
        ProductRepository::new(&mut *conn)
            .find_by_id(product_id)
            .await
            .unwrap()
            .unwrap()
            .stock
    }

    pub async fn set_price(&self, product_id: i64, price: i64) {
        sqlx::query("UPDATE product SET price = ?1, name = 'Renamed' WHERE id = ?2")
            .bind(price)
            .bind(product_id)
            .execute(self.db.pool())
            .await
            .unwrap();
    }

    pub async fn cart_item_exists(&self, id: i64) -> bool {
        let mut conn = self.db.acquire().await.unwrap();
        CartItemRepository::new(&mut *conn)
            .find_by_id(id)
            .await
            .unwrap()
            .is_some()
    }

    pub async fn order_point_id(&self, order_id: i64) -> i64 {
        let mut conn = self.db.acquire().await.unwrap();
        OrderRepository::new(&mut *conn)
            .find_by_id(order_id)
            .await
            .unwrap()
            .unwrap()
            .point_id
    }

    /// Runs raw SQL, e.g. to install a trigger standing in for another writer.
    pub async fn execute(&self, sql: &str) {
        sqlx::query(sql).execute(self.db.pool()).await.unwrap();
    }

    pub async fn count(&self, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(self.db.pool())
            .await
            .unwrap()
    }

    /// No order exists and every given cart line is still in the cart.
    pub async fn assert_nothing_placed(&self, cart_item_ids: &[i64]) {
        assert_eq!(self.count("orders").await, 0);
        assert_eq!(self.count("order_item").await, 0);
        for &id in cart_item_ids {
            assert!(self.cart_item_exists(id).await, "cart item {id} was deleted");
        }
    }
}
