//! Identity and dependency metadata shared by every record type.

use serde::Serialize;
use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{FromRow, Sqlite};
use std::fmt;

/// The record types copied by the seeder.
///
/// Declaration order is the tie-breaker for [`EntityKind::dependency_order`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    User,
    Chat,
    Message,
    UserChatLink,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [
        EntityKind::User,
        EntityKind::Chat,
        EntityKind::Message,
        EntityKind::UserChatLink,
    ];

    /// Returns the table holding records of this kind.
    pub fn table(&self) -> &'static str {
        match self {
            EntityKind::User => "users",
            EntityKind::Chat => "chats",
            EntityKind::Message => "messages",
            EntityKind::UserChatLink => "user_chat_links",
        }
    }

    /// Key under which this kind appears in a seed report.
    pub fn report_key(&self) -> &'static str {
        match self {
            EntityKind::User => "user_count",
            EntityKind::Chat => "chat_count",
            EntityKind::Message => "message_count",
            EntityKind::UserChatLink => "link_count",
        }
    }

    /// Column counted when reporting how many records a store holds.
    ///
    /// Links have no `id`, so they are counted by their user side.
    pub fn count_column(&self) -> &'static str {
        match self {
            EntityKind::UserChatLink => "user_id",
            _ => "id",
        }
    }

    /// Columns that order a full read in natural enumeration order.
    pub fn order_columns(&self) -> &'static str {
        match self {
            EntityKind::UserChatLink => "user_id, chat_id",
            _ => "id",
        }
    }

    /// Kinds whose records must already exist before this kind is merged.
    pub fn dependencies(&self) -> &'static [EntityKind] {
        match self {
            EntityKind::User => &[],
            EntityKind::Chat => &[EntityKind::User],
            EntityKind::Message => &[EntityKind::User, EntityKind::Chat],
            EntityKind::UserChatLink => &[EntityKind::User, EntityKind::Chat],
        }
    }

    /// Topologically sorts all kinds so every kind follows its dependencies.
    pub fn dependency_order() -> Vec<EntityKind> {
        let mut ordered: Vec<EntityKind> = Vec::with_capacity(Self::ALL.len());

        while ordered.len() < Self::ALL.len() {
            let next = Self::ALL.iter().copied().find(|kind| {
                !ordered.contains(kind)
                    && kind.dependencies().iter().all(|dep| ordered.contains(dep))
            });

            match next {
                Some(kind) => ordered.push(kind),
                // A cycle would leave kinds unplaceable; the dependency table has none.
                None => break,
            }
        }

        ordered
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::User => "user",
            EntityKind::Chat => "chat",
            EntityKind::Message => "message",
            EntityKind::UserChatLink => "user_chat_link",
        };
        write!(f, "{}", name)
    }
}

/// Value that decides whether two records denote the same entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentityKey {
    /// Synthetic numeric id.
    Single(i64),
    /// Composite `(user_id, chat_id)` key of a link record.
    Pair(i64, i64),
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentityKey::Single(id) => write!(f, "{}", id),
            IdentityKey::Pair(user_id, chat_id) => write!(f, "({}, {})", user_id, chat_id),
        }
    }
}

/// A record projection ready to be written to the destination.
pub trait Insertable: Send + Sync {
    /// Parameterised INSERT statement for the projection.
    const INSERT_SQL: &'static str;

    /// Binds the projection's values to [`Self::INSERT_SQL`] in column order.
    fn bind<'q>(
        &'q self,
        query: Query<'q, Sqlite, SqliteArguments<'q>>,
    ) -> Query<'q, Sqlite, SqliteArguments<'q>>;
}

/// A record type the seeder knows how to read, identify and copy.
pub trait Entity: for<'r> FromRow<'r, SqliteRow> + Send + Sync + Unpin {
    const KIND: EntityKind;

    type Insert: Insertable;

    fn identity_key(&self) -> IdentityKey;

    /// Builds the row to insert into the destination.
    fn to_insertable(&self) -> Self::Insert;

    /// Foreign keys this record points at.
    fn references(&self) -> Vec<(EntityKind, i64)> {
        Vec::new()
    }
}
