//! Show record counts of both stores.

use clap::Args;
use std::path::Path;

use chatseed::config::Config;
use chatseed::db::{open_read_only, Store, StoreRole};
use chatseed::error::SeedError;
use chatseed::models::EntityKind;

/// Show how many records each store holds
///
/// Both stores are opened read-only; nothing is created or migrated.
#[derive(Debug, Args)]
pub struct StatusCommand {}

impl StatusCommand {
    pub async fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        println!("Source:      {}", config.source_database_path.display());
        println!(
            "Destination: {}",
            config.destination_database_path.display()
        );
        println!();

        let source = open_if_exists(&config.source_database_path, StoreRole::Source).await?;
        let destination =
            open_if_exists(&config.destination_database_path, StoreRole::Destination).await?;

        println!("{:<16} {:>10} {:>12}", "KIND", "SOURCE", "DESTINATION");
        println!("{}", "-".repeat(40));

        for kind in EntityKind::dependency_order() {
            println!(
                "{:<16} {:>10} {:>12}",
                kind.to_string(),
                count_or_dash(source.as_ref(), kind).await?,
                count_or_dash(destination.as_ref(), kind).await?
            );
        }

        if let Some(store) = source {
            store.close().await;
        }
        if let Some(store) = destination {
            store.close().await;
        }

        Ok(())
    }
}

async fn open_if_exists(path: &Path, role: StoreRole) -> Result<Option<Store>, SeedError> {
    if !path.exists() {
        return Ok(None);
    }
    open_read_only(path, role).await.map(Some)
}

async fn count_or_dash(store: Option<&Store>, kind: EntityKind) -> Result<String, SeedError> {
    match store {
        Some(store) => Ok(store.count(kind).await?.to_string()),
        None => Ok("-".to_string()),
    }
}
