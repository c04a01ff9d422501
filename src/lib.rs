//! Idempotent seeding of a chat database.
//!
//! Copies users, chats, messages and chat memberships from a local SQLite
//! snapshot into a destination database. Records whose identity key already
//! exists in the destination are left alone, so a run can be repeated safely.
//!
//! # Usage
//!
//! ```no_run
//! use chatseed::db::{open_store, StoreRole};
//! use chatseed::run_sync;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), chatseed::SeedError> {
//! let source = open_store(Path::new("initial.db"), StoreRole::Source).await?;
//! let destination = open_store(Path::new("chat.db"), StoreRole::Destination).await?;
//!
//! let report = run_sync(&source, &destination).await?;
//! println!("{}", serde_json::to_string_pretty(&report).unwrap());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod db;
pub mod error;
pub mod handler;
pub mod merge;
pub mod models;
pub mod seeder;

#[cfg(test)]
pub(crate) mod testutil;

pub use config::{Config, ConfigError};
pub use error::SeedError;
pub use handler::{handle, HandlerResponse};
pub use seeder::{run_sync, seed_from_config, MergeReport, SeedReport, Seeder};
