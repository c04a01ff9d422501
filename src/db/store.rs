use sqlx::{Sqlite, SqlitePool, Transaction};

use super::StoreRole;
use crate::error::SeedError;
use crate::models::{Entity, EntityKind, Insertable};

/// Handle to one relational store.
#[derive(Debug, Clone)]
pub struct Store {
    pool: SqlitePool,
    role: StoreRole,
}

impl Store {
    pub fn new(pool: SqlitePool, role: StoreRole) -> Self {
        Self { pool, role }
    }

    pub fn role(&self) -> StoreRole {
        self.role
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Reads every record of `E`, ordered by identity key.
    pub async fn read_all<E: Entity>(&self) -> Result<Vec<E>, SeedError> {
        let kind = E::KIND;
        let sql = format!(
            "SELECT * FROM {} ORDER BY {}",
            kind.table(),
            kind.order_columns()
        );

        sqlx::query_as::<_, E>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(SeedError::store(self.role, "reading records"))
    }

    /// Number of records of `kind` currently present.
    pub async fn count(&self, kind: EntityKind) -> Result<u64, SeedError> {
        let sql = format!(
            "SELECT COUNT({}) FROM {}",
            kind.count_column(),
            kind.table()
        );

        let count: i64 = sqlx::query_scalar(&sql)
            .fetch_one(&self.pool)
            .await
            .map_err(SeedError::store(self.role, "counting records"))?;

        Ok(count.max(0) as u64)
    }

    /// Numeric ids of every record of a numeric-id `kind`.
    pub async fn read_ids(&self, kind: EntityKind) -> Result<Vec<i64>, SeedError> {
        let sql = format!("SELECT id FROM {} ORDER BY id", kind.table());

        sqlx::query_scalar(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(SeedError::store(self.role, "reading ids"))
    }

    /// Opens the transaction that scopes one entity kind's inserts.
    ///
    /// Dropping the transaction without committing rolls it back.
    pub async fn begin(&self) -> Result<Transaction<'static, Sqlite>, SeedError> {
        self.pool
            .begin()
            .await
            .map_err(SeedError::store(self.role, "starting a transaction"))
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Inserts one projection inside an open transaction.
pub async fn insert<I: Insertable>(
    tx: &mut Transaction<'_, Sqlite>,
    row: &I,
) -> Result<(), sqlx::Error> {
    row.bind(sqlx::query(I::INSERT_SQL))
        .execute(&mut **tx)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Chat, User, UserChatLink};
    use crate::testutil::{fixture_store, Fixture};

    #[tokio::test]
    async fn test_read_all_in_id_order() {
        let ctx = fixture_store(
            &Fixture::new()
                .user(User::new(3, "carol", "carol@example.com", "h"))
                .user(User::new(1, "alice", "alice@example.com", "h"))
                .user(User::new(2, "bob", "bob@example.com", "h")),
        )
        .await;

        let users: Vec<User> = ctx.store.read_all().await.unwrap();
        let ids: Vec<i64> = users.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(users[0].username, "alice");
    }

    #[tokio::test]
    async fn test_count_links_by_user_side() {
        let ctx = fixture_store(
            &Fixture::new()
                .user(User::new(1, "alice", "alice@example.com", "h"))
                .user(User::new(2, "bob", "bob@example.com", "h"))
                .chat(Chat::new(1, "general", 1))
                .link(UserChatLink::new(1, 1))
                .link(UserChatLink::new(2, 1)),
        )
        .await;

        assert_eq!(ctx.store.count(EntityKind::UserChatLink).await.unwrap(), 2);
        assert_eq!(ctx.store.count(EntityKind::User).await.unwrap(), 2);
        assert_eq!(ctx.store.count(EntityKind::Message).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_insert_assigns_fresh_id() {
        let ctx = fixture_store(
            &Fixture::new().user(User::new(5, "alice", "alice@example.com", "h")),
        )
        .await;

        let source_user = User::new(1, "bob", "bob@example.com", "h");
        let mut tx = ctx.store.begin().await.unwrap();
        insert(&mut tx, &source_user.to_insertable()).await.unwrap();
        tx.commit().await.unwrap();

        let ids = ctx.store.read_ids(EntityKind::User).await.unwrap();
        assert_eq!(ids, vec![5, 6]);
    }

    #[tokio::test]
    async fn test_uncommitted_insert_rolls_back_on_drop() {
        let ctx = fixture_store(&Fixture::new()).await;

        {
            let mut tx = ctx.store.begin().await.unwrap();
            insert(
                &mut tx,
                &User::new(1, "alice", "alice@example.com", "h").to_insertable(),
            )
            .await
            .unwrap();
        }

        assert_eq!(ctx.store.count(EntityKind::User).await.unwrap(), 0);
    }
}
