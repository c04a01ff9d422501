use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::query::Query;
use sqlx::sqlite::SqliteArguments;
use sqlx::Sqlite;

use super::entity::{Entity, EntityKind, IdentityKey, Insertable};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Message {
    pub id: i64,
    pub text: String,
    pub user_id: i64,
    pub chat_id: i64,
    pub created_at: Option<NaiveDateTime>,
}

impl Message {
    pub fn new(id: i64, text: impl Into<String>, user_id: i64, chat_id: i64) -> Self {
        Self {
            id,
            text: text.into(),
            user_id,
            chat_id,
            created_at: None,
        }
    }

    pub fn with_created_at(mut self, created_at: NaiveDateTime) -> Self {
        self.created_at = Some(created_at);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewMessage {
    pub text: String,
    pub user_id: i64,
    pub chat_id: i64,
    pub created_at: Option<NaiveDateTime>,
}

impl Insertable for NewMessage {
    const INSERT_SQL: &'static str =
        "INSERT INTO messages (text, user_id, chat_id, created_at) VALUES (?, ?, ?, ?)";

    fn bind<'q>(
        &'q self,
        query: Query<'q, Sqlite, SqliteArguments<'q>>,
    ) -> Query<'q, Sqlite, SqliteArguments<'q>> {
        query
            .bind(&self.text)
            .bind(self.user_id)
            .bind(self.chat_id)
            .bind(self.created_at)
    }
}

impl Entity for Message {
    const KIND: EntityKind = EntityKind::Message;

    type Insert = NewMessage;

    fn identity_key(&self) -> IdentityKey {
        IdentityKey::Single(self.id)
    }

    fn to_insertable(&self) -> NewMessage {
        NewMessage {
            text: self.text.clone(),
            user_id: self.user_id,
            chat_id: self.chat_id,
            created_at: self.created_at,
        }
    }

    fn references(&self) -> Vec<(EntityKind, i64)> {
        vec![
            (EntityKind::User, self.user_id),
            (EntityKind::Chat, self.chat_id),
        ]
    }
}
