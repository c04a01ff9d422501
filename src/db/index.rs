//! In-memory lookups over destination keys.

use std::collections::{HashMap, HashSet};

use super::Store;
use crate::error::SeedError;
use crate::models::{Entity, EntityKind, IdentityKey};

/// Identity keys already present in the destination for one entity kind.
///
/// Rebuilt from a full read-back before every merge; never updated in place.
#[derive(Debug, Clone, Default)]
pub struct ExistenceIndex {
    keys: HashSet<IdentityKey>,
}

impl ExistenceIndex {
    pub fn build<I>(keys: I) -> Self
    where
        I: IntoIterator<Item = IdentityKey>,
    {
        Self {
            keys: keys.into_iter().collect(),
        }
    }

    /// Indexes the identity keys of already-loaded records.
    pub fn from_records<E: Entity>(records: &[E]) -> Self {
        Self::build(records.iter().map(Entity::identity_key))
    }

    pub fn contains(&self, key: &IdentityKey) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Destination ids of the kinds a merge depends on.
#[derive(Debug, Clone, Default)]
pub struct DependencyIndex {
    ids: HashMap<EntityKind, HashSet<i64>>,
}

impl DependencyIndex {
    /// Loads the ids of every dependency of `kind` from the destination.
    pub async fn load(destination: &Store, kind: EntityKind) -> Result<Self, SeedError> {
        let mut ids = HashMap::new();
        for dep in kind.dependencies() {
            let dep_ids = destination.read_ids(*dep).await?;
            ids.insert(*dep, dep_ids.into_iter().collect());
        }
        Ok(Self { ids })
    }

    pub fn with_ids<I>(mut self, kind: EntityKind, ids: I) -> Self
    where
        I: IntoIterator<Item = i64>,
    {
        self.ids.entry(kind).or_default().extend(ids);
        self
    }

    /// Returns the first reference of `record` the destination cannot satisfy.
    pub fn check<E: Entity>(&self, record: &E) -> Option<(EntityKind, i64)> {
        record.references().into_iter().find(|(kind, id)| {
            !self
                .ids
                .get(kind)
                .is_some_and(|present| present.contains(id))
        })
    }
}
