use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::query::Query;
use sqlx::sqlite::SqliteArguments;
use sqlx::Sqlite;

use super::entity::{Entity, EntityKind, IdentityKey, Insertable};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub hashed_password: String,
    pub created_at: Option<NaiveDateTime>,
}

impl User {
    pub fn new(
        id: i64,
        username: impl Into<String>,
        email: impl Into<String>,
        hashed_password: impl Into<String>,
    ) -> Self {
        Self {
            id,
            username: username.into(),
            email: email.into(),
            hashed_password: hashed_password.into(),
            created_at: None,
        }
    }

    pub fn with_created_at(mut self, created_at: NaiveDateTime) -> Self {
        self.created_at = Some(created_at);
        self
    }
}

/// A user without its id; the destination assigns a fresh one.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub hashed_password: String,
    pub created_at: Option<NaiveDateTime>,
}

impl Insertable for NewUser {
    const INSERT_SQL: &'static str =
        "INSERT INTO users (username, email, hashed_password, created_at) VALUES (?, ?, ?, ?)";

    fn bind<'q>(
        &'q self,
        query: Query<'q, Sqlite, SqliteArguments<'q>>,
    ) -> Query<'q, Sqlite, SqliteArguments<'q>> {
        query
            .bind(&self.username)
            .bind(&self.email)
            .bind(&self.hashed_password)
            .bind(self.created_at)
    }
}

impl Entity for User {
    const KIND: EntityKind = EntityKind::User;

    type Insert = NewUser;

    fn identity_key(&self) -> IdentityKey {
        IdentityKey::Single(self.id)
    }

    fn to_insertable(&self) -> NewUser {
        NewUser {
            username: self.username.clone(),
            email: self.email.clone(),
            hashed_password: self.hashed_password.clone(),
            created_at: self.created_at,
        }
    }
}
