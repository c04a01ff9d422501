use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::query::Query;
use sqlx::sqlite::SqliteArguments;
use sqlx::Sqlite;

use super::entity::{Entity, EntityKind, IdentityKey, Insertable};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Chat {
    pub id: i64,
    pub name: String,
    pub owner_id: i64,
    pub created_at: Option<NaiveDateTime>,
}

impl Chat {
    pub fn new(id: i64, name: impl Into<String>, owner_id: i64) -> Self {
        Self {
            id,
            name: name.into(),
            owner_id,
            created_at: None,
        }
    }

    pub fn with_created_at(mut self, created_at: NaiveDateTime) -> Self {
        self.created_at = Some(created_at);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewChat {
    pub name: String,
    pub owner_id: i64,
    pub created_at: Option<NaiveDateTime>,
}

impl Insertable for NewChat {
    const INSERT_SQL: &'static str =
        "INSERT INTO chats (name, owner_id, created_at) VALUES (?, ?, ?)";

    fn bind<'q>(
        &'q self,
        query: Query<'q, Sqlite, SqliteArguments<'q>>,
    ) -> Query<'q, Sqlite, SqliteArguments<'q>> {
        query
            .bind(&self.name)
            .bind(self.owner_id)
            .bind(self.created_at)
    }
}

impl Entity for Chat {
    const KIND: EntityKind = EntityKind::Chat;

    type Insert = NewChat;

    fn identity_key(&self) -> IdentityKey {
        IdentityKey::Single(self.id)
    }

    fn to_insertable(&self) -> NewChat {
        NewChat {
            name: self.name.clone(),
            owner_id: self.owner_id,
            created_at: self.created_at,
        }
    }

    fn references(&self) -> Vec<(EntityKind, i64)> {
        vec![(EntityKind::User, self.owner_id)]
    }
}
