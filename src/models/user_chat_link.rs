use serde::{Deserialize, Serialize};
use sqlx::query::Query;
use sqlx::sqlite::SqliteArguments;
use sqlx::Sqlite;

use super::entity::{Entity, EntityKind, IdentityKey, Insertable};

/// Membership of a user in a chat.
///
/// The `(user_id, chat_id)` pair is the whole record and its identity, so it
/// is inserted as-is rather than through an id-less projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserChatLink {
    pub user_id: i64,
    pub chat_id: i64,
}

impl UserChatLink {
    pub fn new(user_id: i64, chat_id: i64) -> Self {
        Self { user_id, chat_id }
    }
}

impl Insertable for UserChatLink {
    const INSERT_SQL: &'static str = "INSERT INTO user_chat_links (user_id, chat_id) VALUES (?, ?)";

    fn bind<'q>(
        &'q self,
        query: Query<'q, Sqlite, SqliteArguments<'q>>,
    ) -> Query<'q, Sqlite, SqliteArguments<'q>> {
        query.bind(self.user_id).bind(self.chat_id)
    }
}

impl Entity for UserChatLink {
    const KIND: EntityKind = EntityKind::UserChatLink;

    type Insert = UserChatLink;

    fn identity_key(&self) -> IdentityKey {
        IdentityKey::Pair(self.user_id, self.chat_id)
    }

    fn to_insertable(&self) -> UserChatLink {
        *self
    }

    fn references(&self) -> Vec<(EntityKind, i64)> {
        vec![
            (EntityKind::User, self.user_id),
            (EntityKind::Chat, self.chat_id),
        ]
    }
}
