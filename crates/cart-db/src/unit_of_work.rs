//! # Unit of Work
//!
//! One database transaction shared by every repository an operation touches.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Unit of Work Lifecycle                             │
//! │                                                                         │
//! │  db.begin().await?                                                     │
//! │       │  BEGIN IMMEDIATE (write lock taken up front)                   │
//! │       ▼                                                                 │
//! │  uow.points() / uow.products() / uow.cart_items() / uow.orders()       │
//! │       │  every statement runs on the same connection                   │
//! │       │                                                                 │
//! │       ├── uow.commit()   ──► COMMIT   (all writes visible at once)      │
//! │       ├── uow.rollback() ──► ROLLBACK                                   │
//! │       └── dropped        ──► ROLLBACK (error via `?`, timeout, panic)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing written through a unit of work is visible to other connections
//! until [`UnitOfWork::commit`] returns `Ok`.
//!
//! Units start with `BEGIN IMMEDIATE`. Placement reads before it writes,
//! and a deferred transaction's read-to-write upgrade fails with
//! `SQLITE_BUSY` at once instead of waiting on `busy_timeout`.

use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::cart_item::CartItemRepository;
use crate::repository::member::MemberRepository;
use crate::repository::order::OrderRepository;
use crate::repository::point::PointRepository;
use crate::repository::product::ProductRepository;

/// An open transaction with repository accessors.
///
/// ## Usage
/// ```rust,ignore
/// let mut uow = db.begin().await?;
/// uow.products().update_stock(product_id, 10, 7).await?;
/// uow.cart_items().delete_by_ids(&[cart_item_id]).await?;
/// uow.commit().await?;
/// ```
#[derive(Debug)]
pub struct UnitOfWork {
    tx: Transaction<'static, Sqlite>,
}

impl UnitOfWork {
    /// Starts a write transaction on a connection from `pool`.
    pub async fn begin(pool: &SqlitePool) -> DbResult<Self> {
        let tx = pool
            .begin_with("BEGIN IMMEDIATE")
            .await
            .map_err(|e| match DbError::from(e) {
                DbError::PoolExhausted => DbError::PoolExhausted,
                DbError::Busy(msg) => DbError::Busy(msg),
                other => DbError::TransactionFailed(other.to_string()),
            })?;

        debug!("Transaction started");
        Ok(UnitOfWork { tx })
    }

    pub fn members(&mut self) -> MemberRepository<'_> {
        MemberRepository::new(&mut *self.tx)
    }

    pub fn products(&mut self) -> ProductRepository<'_> {
        ProductRepository::new(&mut *self.tx)
    }

    pub fn cart_items(&mut self) -> CartItemRepository<'_> {
        CartItemRepository::new(&mut *self.tx)
    }

    pub fn points(&mut self) -> PointRepository<'_> {
        PointRepository::new(&mut *self.tx)
    }

    pub fn orders(&mut self) -> OrderRepository<'_> {
        OrderRepository::new(&mut *self.tx)
    }

    /// Makes every write of this unit visible atomically.
    pub async fn commit(self) -> DbResult<()> {
        self.tx.commit().await.map_err(|e| match DbError::from(e) {
            DbError::Busy(msg) => DbError::Busy(msg),
            other => DbError::TransactionFailed(other.to_string()),
        })?;

        debug!("Transaction committed");
        Ok(())
    }

    /// Discards every write of this unit.
    ///
    /// Dropping the unit has the same effect; this form reports failures.
    pub async fn rollback(self) -> DbResult<()> {
        self.tx
            .rollback()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        debug!("Transaction rolled back");
        Ok(())
    }
}
