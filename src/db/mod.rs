//! SQLite-backed record stores.
//!
//! The seeder works against two stores: a read-only source snapshot and a
//! mutable destination. Both are plain [`Store`] handles opened here and
//! passed explicitly to everything that needs them.

mod index;
mod store;

pub use index::{DependencyIndex, ExistenceIndex};
pub use store::{insert, Store};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::fmt;
use std::path::Path;

use crate::error::SeedError;

/// Which side of a seed run a store plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreRole {
    Source,
    Destination,
}

impl fmt::Display for StoreRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreRole::Source => write!(f, "Source"),
            StoreRole::Destination => write!(f, "Destination"),
        }
    }
}

/// Opens a store for the given role.
///
/// The source is opened read-only and must already exist. The destination is
/// created if missing and its schema is brought up to date.
pub async fn open_store(path: &Path, role: StoreRole) -> Result<Store, SeedError> {
    if role == StoreRole::Source {
        return open_read_only(path, role).await;
    }

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            tracing::warn!(
                "Failed to create database directory {}: {}",
                parent.display(),
                e
            );
        }
    }

    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = connect(options, role).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    tracing::debug!("Opened {} store at {}", role, path.display());

    Ok(Store::new(pool, role))
}

/// Opens an existing database without creating or migrating anything.
pub async fn open_read_only(path: &Path, role: StoreRole) -> Result<Store, SeedError> {
    let options = SqliteConnectOptions::new().filename(path).read_only(true);
    let pool = connect(options, role).await?;

    tracing::debug!("Opened {} store at {} (read-only)", role, path.display());

    Ok(Store::new(pool, role))
}

async fn connect(options: SqliteConnectOptions, role: StoreRole) -> Result<SqlitePool, SeedError> {
    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .map_err(SeedError::store(role, "connecting"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntityKind;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_open_destination_creates_tables() {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("nested").join("dest.db");

        let store = open_store(&db_path, StoreRole::Destination).await.unwrap();

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' AND name NOT LIKE '_sqlx_%' ORDER BY name",
        )
        .fetch_all(store.pool())
        .await
        .unwrap();

        let table_names: Vec<&str> = tables.iter().map(|t| t.0.as_str()).collect();
        assert_eq!(
            table_names,
            vec!["chats", "messages", "user_chat_links", "users"]
        );
    }

    #[tokio::test]
    async fn test_open_destination_twice_is_harmless() {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("dest.db");

        let first = open_store(&db_path, StoreRole::Destination).await.unwrap();
        first.close().await;

        let second = open_store(&db_path, StoreRole::Destination).await.unwrap();
        assert_eq!(second.role(), StoreRole::Destination);
    }

    #[tokio::test]
    async fn test_open_missing_source_is_unavailable() {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("missing.db");

        let err = open_store(&db_path, StoreRole::Source).await.unwrap_err();
        assert!(matches!(
            err,
            SeedError::StoreUnavailable {
                role: StoreRole::Source,
                ..
            }
        ));
        assert!(!db_path.exists());
    }

    #[tokio::test]
    async fn test_open_read_only_leaves_schema_alone() {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("existing.db");

        let pool = SqlitePoolOptions::new()
            .connect_with(
                SqliteConnectOptions::new()
                    .filename(&db_path)
                    .create_if_missing(true),
            )
            .await
            .unwrap();
        sqlx::query("CREATE TABLE users (id INTEGER PRIMARY KEY, username TEXT)")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO users (id, username) VALUES (1, 'alice')")
            .execute(&pool)
            .await
            .unwrap();
        pool.close().await;

        let store = open_read_only(&db_path, StoreRole::Destination)
            .await
            .unwrap();
        assert_eq!(store.role(), StoreRole::Destination);
        assert_eq!(store.count(EntityKind::User).await.unwrap(), 1);

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type='table' ORDER BY name",
        )
        .fetch_all(store.pool())
        .await
        .unwrap();
        let table_names: Vec<&str> = tables.iter().map(|t| t.0.as_str()).collect();
        assert_eq!(table_names, vec!["users"]);
    }
}
