//! # Member Repository
//!
//! Members are owned by the account system; this store only needs to create
//! them for seeding and to look them up.

use sqlx::SqliteConnection;
use tracing::debug;

use crate::error::DbResult;
use cart_core::Member;

/// Repository for member lookups.
#[derive(Debug)]
pub struct MemberRepository<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> MemberRepository<'c> {
    /// Creates a new MemberRepository on `conn`.
    pub fn new(conn: &'c mut SqliteConnection) -> Self {
        MemberRepository { conn }
    }

    /// Inserts a member and returns it with its generated id.
    pub async fn insert(&mut self, email: &str) -> DbResult<Member> {
        debug!(email = %email, "Inserting member");

        let member = sqlx::query_as::<_, Member>(
            "INSERT INTO member (email) VALUES (?1) RETURNING id, email",
        )
        .bind(email)
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(member)
    }

    /// Gets a member by ID.
    pub async fn find_by_id(&mut self, id: i64) -> DbResult<Option<Member>> {
        let member = sqlx::query_as::<_, Member>("SELECT id, email FROM member WHERE id = ?1")
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await?;

        Ok(member)
    }

    /// Gets a member by email.
    pub async fn find_by_email(&mut self, email: &str) -> DbResult<Option<Member>> {
        let member = sqlx::query_as::<_, Member>("SELECT id, email FROM member WHERE email = ?1")
            .bind(email)
            .fetch_optional(&mut *self.conn)
            .await?;

        Ok(member)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn test_insert_and_find() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut uow = db.begin().await.unwrap();

        let hardy = uow.members().insert("hardy@example.com").await.unwrap();
        assert!(hardy.id > 0);

        let by_id = uow.members().find_by_id(hardy.id).await.unwrap();
        assert_eq!(by_id, Some(hardy.clone()));

        let by_email = uow.members().find_by_email("hardy@example.com").await.unwrap();
        assert_eq!(by_email, Some(hardy));

        assert!(uow.members().find_by_id(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut uow = db.begin().await.unwrap();

        uow.members().insert("hardy@example.com").await.unwrap();
        let err = uow.members().insert("hardy@example.com").await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }
}
