//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - Lookup by id for cart validation
//! - Compare-and-set stock decrement at order time
//!
//! ## Stock Writes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Compare-and-Set Stock Update                         │
//! │                                                                         │
//! │  validation read: stock = 10                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  UPDATE product SET stock = 7 WHERE id = ? AND stock = 10              │
//! │       │                                                                 │
//! │       ├── 1 row  ──► decrement applied                                 │
//! │       └── 0 rows ──► someone else sold it first ──► DbError::Conflict  │
//! │                                                                         │
//! │  The stock never goes below what validation promised.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqliteConnection;
use tracing::debug;

use crate::error::{DbError, DbResult};
use cart_core::Product;

/// Fields of a product that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub price: i64,
    pub image_url: String,
    pub stock: i64,
}

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let mut uow = db.begin().await?;
///
/// let product = uow.products().find_by_id(3).await?;
/// uow.products().update_stock(3, 10, 7).await?;
/// ```
#[derive(Debug)]
pub struct ProductRepository<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> ProductRepository<'c> {
    /// Creates a new ProductRepository on `conn`.
    pub fn new(conn: &'c mut SqliteConnection) -> Self {
        ProductRepository { conn }
    }

    /// Inserts a product and returns it with its generated id.
    pub async fn insert(&mut self, product: &NewProduct) -> DbResult<Product> {
        debug!(name = %product.name, "Inserting product");

        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO product (name, price, image_url, stock)
            VALUES (?1, ?2, ?3, ?4)
            RETURNING id, name, price, image_url, stock
            "#,
        )
        .bind(&product.name)
        .bind(product.price)
        .bind(&product.image_url)
        .bind(product.stock)
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(product)
    }

    /// Gets a product by ID.
    pub async fn find_by_id(&mut self, id: i64) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            "SELECT id, name, price, image_url, stock FROM product WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(product)
    }

    /// Sets stock to `new_stock` if it still equals `expected_stock`.
    ///
    /// ## Errors
    /// `DbError::Conflict` when the row is missing or its stock changed since
    /// it was read.
    pub async fn update_stock(
        &mut self,
        id: i64,
        expected_stock: i64,
        new_stock: i64,
    ) -> DbResult<()> {
        debug!(id = %id, expected_stock, new_stock, "Updating stock");

        let result = sqlx::query("UPDATE product SET stock = ?1 WHERE id = ?2 AND stock = ?3")
            .bind(new_stock)
            .bind(id)
            .bind(expected_stock)
            .execute(&mut *self.conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::conflict("Product", id));
        }

        Ok(())
    }
}
