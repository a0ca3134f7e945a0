//! # Cart Item Repository
//!
//! Database operations for cart lines.
//!
//! ## Loading a Line for Checkout
//! ```text
//! cart_item LEFT JOIN product
//!      │
//!      ├── no cart_item row      ──► None
//!      ├── cart_item, no product ──► CartLine { product: None }
//!      └── both                  ──► CartLine { product: Some(..) }
//! ```
//! `cart_item.product_id` has no foreign key, so a line can outlive its
//! product. Checkout reports that as `ProductNotFound`.

use sqlx::{FromRow, QueryBuilder, Sqlite, SqliteConnection};
use tracing::debug;

use crate::error::DbResult;
use cart_core::{CartItem, CartLine, Product};

/// Joined row: cart item columns plus nullable product columns.
#[derive(Debug, FromRow)]
struct CartLineRow {
    id: i64,
    member_id: i64,
    product_id: i64,
    quantity: i64,
    p_id: Option<i64>,
    p_name: Option<String>,
    p_price: Option<i64>,
    p_image_url: Option<String>,
    p_stock: Option<i64>,
}

impl From<CartLineRow> for CartLine {
    fn from(row: CartLineRow) -> Self {
        let product = match (row.p_id, row.p_name, row.p_price, row.p_stock) {
            (Some(id), Some(name), Some(price), Some(stock)) => Some(Product {
                id,
                name,
                price,
                image_url: row.p_image_url.unwrap_or_default(),
                stock,
            }),
            _ => None,
        };

        CartLine {
            cart_item: CartItem {
                id: row.id,
                member_id: row.member_id,
                product_id: row.product_id,
                quantity: row.quantity,
            },
            product,
        }
    }
}

/// Repository for cart item database operations.
#[derive(Debug)]
pub struct CartItemRepository<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> CartItemRepository<'c> {
    /// Creates a new CartItemRepository on `conn`.
    pub fn new(conn: &'c mut SqliteConnection) -> Self {
        CartItemRepository { conn }
    }

    /// Adds a line to a member's cart.
    pub async fn insert(
        &mut self,
        member_id: i64,
        product_id: i64,
        quantity: i64,
    ) -> DbResult<CartItem> {
        debug!(member_id, product_id, quantity, "Inserting cart item");

        let item = sqlx::query_as::<_, CartItem>(
            r#"
            INSERT INTO cart_item (member_id, product_id, quantity)
            VALUES (?1, ?2, ?3)
            RETURNING id, member_id, product_id, quantity
            "#,
        )
        .bind(member_id)
        .bind(product_id)
        .bind(quantity)
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(item)
    }

    /// Gets a cart item by ID.
    pub async fn find_by_id(&mut self, id: i64) -> DbResult<Option<CartItem>> {
        let item = sqlx::query_as::<_, CartItem>(
            "SELECT id, member_id, product_id, quantity FROM cart_item WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(item)
    }

    /// Loads a cart item together with its product, if the product exists.
    pub async fn find_line(&mut self, id: i64) -> DbResult<Option<CartLine>> {
        let row = sqlx::query_as::<_, CartLineRow>(
            r#"
            SELECT
                c.id, c.member_id, c.product_id, c.quantity,
                p.id AS p_id, p.name AS p_name, p.price AS p_price,
                p.image_url AS p_image_url, p.stock AS p_stock
            FROM cart_item c
            LEFT JOIN product p ON p.id = c.product_id
            WHERE c.id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(row.map(CartLine::from))
    }

    /// Gets the member's line for a product.
    pub async fn find_by_member_and_product(
        &mut self,
        member_id: i64,
        product_id: i64,
    ) -> DbResult<Option<CartItem>> {
        let item = sqlx::query_as::<_, CartItem>(
            r#"
            SELECT id, member_id, product_id, quantity
            FROM cart_item
            WHERE member_id = ?1 AND product_id = ?2
            "#,
        )
        .bind(member_id)
        .bind(product_id)
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(item)
    }

    /// Deletes the given lines, returning how many rows were removed.
    pub async fn delete_by_ids(&mut self, ids: &[i64]) -> DbResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        debug!(count = ids.len(), "Deleting cart items");

        let mut builder = QueryBuilder::<Sqlite>::new("DELETE FROM cart_item WHERE id IN (");
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");

        let result = builder.build().execute(&mut *self.conn).await?;
        Ok(result.rows_affected())
    }
}
