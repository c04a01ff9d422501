//! Copies absent records of one entity kind into the destination.

use crate::db::{insert, DependencyIndex, ExistenceIndex, Store};
use crate::error::SeedError;
use crate::models::Entity;

/// Inserts every source record whose identity key is not in `index`.
///
/// Existing destination records are never touched. All inserts for the kind
/// share one transaction: it is committed after the last record, and any
/// error drops it uncommitted, which rolls the kind back as a whole.
///
/// Inserted records get fresh ids, and references to users and chats are
/// copied as they are. A record whose parent landed under a different id
/// therefore fails with [`SeedError::DependencyNotSatisfied`].
///
/// Returns the number of records inserted.
pub async fn merge<E: Entity>(
    destination: &Store,
    source_records: &[E],
    index: &ExistenceIndex,
    dependencies: &DependencyIndex,
) -> Result<u64, SeedError> {
    let kind = E::KIND;
    let mut tx = destination.begin().await?;
    let mut inserted = 0u64;

    for record in source_records {
        let key = record.identity_key();

        if index.contains(&key) {
            tracing::debug!("Skipping {} {}: already in destination", kind, key);
            continue;
        }

        if let Some((missing_kind, missing_id)) = dependencies.check(record) {
            return Err(SeedError::DependencyNotSatisfied {
                kind,
                key,
                missing_kind,
                missing_id,
            });
        }

        insert(&mut tx, &record.to_insertable())
            .await
            .map_err(|e| SeedError::insert_failed(kind, key, e))?;

        tracing::debug!("Inserted {} {}", kind, key);
        inserted += 1;
    }

    tx.commit()
        .await
        .map_err(SeedError::store(destination.role(), "committing"))?;

    Ok(inserted)
}
