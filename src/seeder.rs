//! Runs the merge for every entity kind in dependency order.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::config::Config;
use crate::db::{open_store, DependencyIndex, ExistenceIndex, Store, StoreRole};
use crate::error::SeedError;
use crate::merge::merge;
use crate::models::{Chat, Entity, EntityKind, Message, User, UserChatLink};

/// Counts recorded for one entity kind during a seed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MergeReport {
    /// Records in the source.
    pub local: u64,
    /// Destination records before the merge.
    pub prev: u64,
    /// Records inserted by the merge.
    pub additions: u64,
    /// Destination records after the merge.
    #[serde(rename = "final")]
    pub final_count: u64,
}

/// Per-kind reports in the order the kinds were merged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    entries: Vec<(EntityKind, MergeReport)>,
}

impl SeedReport {
    pub fn get(&self, kind: EntityKind) -> Option<&MergeReport> {
        self.entries
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, report)| report)
    }

    pub fn entries(&self) -> &[(EntityKind, MergeReport)] {
        &self.entries
    }

    /// Total records inserted across all kinds.
    pub fn total_additions(&self) -> u64 {
        self.entries.iter().map(|(_, r)| r.additions).sum()
    }

    fn push(&mut self, kind: EntityKind, report: MergeReport) {
        self.entries.push((kind, report));
    }
}

impl Serialize for SeedReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (kind, report) in &self.entries {
            map.serialize_entry(kind.report_key(), report)?;
        }
        map.end()
    }
}

/// Copies a source snapshot into a destination, one entity kind at a time.
pub struct Seeder<'a> {
    source: &'a Store,
    destination: &'a Store,
}

impl<'a> Seeder<'a> {
    pub fn new(source: &'a Store, destination: &'a Store) -> Self {
        Self {
            source,
            destination,
        }
    }

    /// Merges every kind in dependency order.
    ///
    /// Stops at the first failing kind. Kinds merged before it stay committed.
    pub async fn run(&self) -> Result<SeedReport, SeedError> {
        let mut report = SeedReport::default();

        for kind in EntityKind::dependency_order() {
            let result = match kind {
                EntityKind::User => self.merge_kind::<User>().await,
                EntityKind::Chat => self.merge_kind::<Chat>().await,
                EntityKind::Message => self.merge_kind::<Message>().await,
                EntityKind::UserChatLink => self.merge_kind::<UserChatLink>().await,
            };

            match result {
                Ok(kind_report) => report.push(kind, kind_report),
                Err(e) => {
                    tracing::error!("Seeding {} records failed: {}", kind, e);
                    return Err(e);
                }
            }
        }

        tracing::info!(
            "Seed complete: {} record(s) added",
            report.total_additions()
        );

        Ok(report)
    }

    async fn merge_kind<E: Entity>(&self) -> Result<MergeReport, SeedError> {
        let kind = E::KIND;

        let source_records: Vec<E> = self.source.read_all().await?;
        let local = source_records.len() as u64;

        let prev = self.destination.count(kind).await?;
        let existing: Vec<E> = self.destination.read_all().await?;
        let index = ExistenceIndex::from_records(&existing);
        let dependencies = DependencyIndex::load(self.destination, kind).await?;

        let additions = merge(self.destination, &source_records, &index, &dependencies).await?;
        let final_count = self.destination.count(kind).await?;

        if final_count != prev + additions {
            tracing::warn!(
                "{} count drifted during merge: {} before + {} added != {} after",
                kind,
                prev,
                additions,
                final_count
            );
        }

        tracing::info!(
            "Merged {}: local={} prev={} additions={} final={}",
            kind,
            local,
            prev,
            additions,
            final_count
        );

        Ok(MergeReport {
            local,
            prev,
            additions,
            final_count,
        })
    }
}

/// Seeds `destination` from `source`.
///
/// References are not remapped. If the source has id gaps, or the
/// destination already holds records, a parent can be inserted under a
/// different id and its children then fail with
/// [`SeedError::DependencyNotSatisfied`], even when the destination starts empty.
pub async fn run_sync(source: &Store, destination: &Store) -> Result<SeedReport, SeedError> {
    Seeder::new(source, destination).run().await
}

/// Opens both stores named in `config` and seeds the destination.
pub async fn seed_from_config(config: &Config) -> Result<SeedReport, SeedError> {
    let source = open_store(&config.source_database_path, StoreRole::Source).await?;
    let destination = open_store(&config.destination_database_path, StoreRole::Destination).await?;

    let result = run_sync(&source, &destination).await;

    source.close().await;
    destination.close().await;

    result
}
