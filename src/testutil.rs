//! Fixtures for tests that need populated SQLite stores.

use std::path::Path;
use tempfile::TempDir;

use crate::db::{open_store, Store, StoreRole};
use crate::models::{Chat, Message, User, UserChatLink};

/// Records written verbatim, ids included.
#[derive(Debug, Clone, Default)]
pub(crate) struct Fixture {
    pub users: Vec<User>,
    pub chats: Vec<Chat>,
    pub messages: Vec<Message>,
    pub links: Vec<UserChatLink>,
}

impl Fixture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user(mut self, user: User) -> Self {
        self.users.push(user);
        self
    }

    pub fn chat(mut self, chat: Chat) -> Self {
        self.chats.push(chat);
        self
    }

    pub fn message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    pub fn link(mut self, link: UserChatLink) -> Self {
        self.links.push(link);
        self
    }

    /// A small chat dataset: three users, two chats, three messages, four links.
    pub fn chat_dataset() -> Self {
        Self::new()
            .user(User::new(1, "alice", "alice@example.com", "hash-a"))
            .user(User::new(2, "bob", "bob@example.com", "hash-b"))
            .user(User::new(3, "carol", "carol@example.com", "hash-c"))
            .chat(Chat::new(1, "general", 1))
            .chat(Chat::new(2, "random", 2))
            .message(Message::new(1, "hello", 1, 1))
            .message(Message::new(2, "hi alice", 2, 1))
            .message(Message::new(3, "anyone here?", 3, 2))
            .link(UserChatLink::new(1, 1))
            .link(UserChatLink::new(2, 1))
            .link(UserChatLink::new(2, 2))
            .link(UserChatLink::new(3, 2))
    }

    pub async fn write(&self, store: &Store) {
        let pool = store.pool();

        for user in &self.users {
            sqlx::query(
                "INSERT INTO users (id, username, email, hashed_password, created_at) VALUES (?, ?, ?, ?, ?)",
            )
            .bind(user.id)
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.hashed_password)
            .bind(user.created_at)
            .execute(pool)
            .await
            .unwrap();
        }

        for chat in &self.chats {
            sqlx::query("INSERT INTO chats (id, name, owner_id, created_at) VALUES (?, ?, ?, ?)")
                .bind(chat.id)
                .bind(&chat.name)
                .bind(chat.owner_id)
                .bind(chat.created_at)
                .execute(pool)
                .await
                .unwrap();
        }

        for message in &self.messages {
            sqlx::query(
                "INSERT INTO messages (id, text, user_id, chat_id, created_at) VALUES (?, ?, ?, ?, ?)",
            )
            .bind(message.id)
            .bind(&message.text)
            .bind(message.user_id)
            .bind(message.chat_id)
            .bind(message.created_at)
            .execute(pool)
            .await
            .unwrap();
        }

        for link in &self.links {
            sqlx::query("INSERT INTO user_chat_links (user_id, chat_id) VALUES (?, ?)")
                .bind(link.user_id)
                .bind(link.chat_id)
                .execute(pool)
                .await
                .unwrap();
        }
    }
}

pub(crate) struct StoreContext {
    pub store: Store,
    _temp_dir: TempDir, // Keep alive for duration of test
}

/// A writable store holding `fixture`.
pub(crate) async fn fixture_store(fixture: &Fixture) -> StoreContext {
    let temp_dir = TempDir::new().unwrap();
    let store = open_store(&temp_dir.path().join("store.db"), StoreRole::Destination)
        .await
        .unwrap();
    fixture.write(&store).await;
    StoreContext {
        store,
        _temp_dir: temp_dir,
    }
}

pub(crate) struct SeedContext {
    pub source: Store,
    pub destination: Store,
    _temp_dir: TempDir,
}

/// A read-only source snapshot and a destination, each pre-populated.
pub(crate) async fn seed_context(source: &Fixture, destination: &Fixture) -> SeedContext {
    let temp_dir = TempDir::new().unwrap();
    let source_path = temp_dir.path().join("source.db");
    let destination_path = temp_dir.path().join("destination.db");

    write_snapshot(&source_path, source).await;

    let source_store = open_store(&source_path, StoreRole::Source).await.unwrap();
    let destination_store = open_store(&destination_path, StoreRole::Destination)
        .await
        .unwrap();
    destination.write(&destination_store).await;

    SeedContext {
        source: source_store,
        destination: destination_store,
        _temp_dir: temp_dir,
    }
}

/// Writes `fixture` into a fresh database file and closes it.
pub(crate) async fn write_snapshot(path: &Path, fixture: &Fixture) {
    let store = open_store(path, StoreRole::Destination).await.unwrap();
    fixture.write(&store).await;
    store.close().await;
}
