//! Seeding error types.

use thiserror::Error;

use crate::db::StoreRole;
use crate::models::{EntityKind, IdentityKey};

/// Errors that abort a seed run.
#[derive(Debug, Error)]
pub enum SeedError {
    /// The store could not be reached or refused the operation.
    #[error("{role} store unavailable while {operation}: {source}")]
    StoreUnavailable {
        role: StoreRole,
        operation: &'static str,
        #[source]
        source: sqlx::Error,
    },

    /// The destination rejected an insert.
    #[error("Destination rejected {kind} {key}: {message}")]
    ConstraintViolation {
        kind: EntityKind,
        key: IdentityKey,
        message: String,
    },

    /// A record points at a user or chat the destination does not hold.
    #[error("{kind} {key} references {missing_kind} {missing_id}, which is not in the destination")]
    DependencyNotSatisfied {
        kind: EntityKind,
        key: IdentityKey,
        missing_kind: EntityKind,
        missing_id: i64,
    },

    /// Creating the destination schema failed.
    #[error("Failed to create destination schema: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl SeedError {
    pub(crate) fn store(role: StoreRole, operation: &'static str) -> impl FnOnce(sqlx::Error) -> Self {
        move |source| SeedError::StoreUnavailable {
            role,
            operation,
            source,
        }
    }

    /// Classifies a failed insert: constraint rejections keep the offending key,
    /// anything else means the destination itself is unavailable.
    pub(crate) fn insert_failed(kind: EntityKind, key: IdentityKey, source: sqlx::Error) -> Self {
        match &source {
            sqlx::Error::Database(db_err)
                if !matches!(db_err.kind(), sqlx::error::ErrorKind::Other) =>
            {
                SeedError::ConstraintViolation {
                    kind,
                    key,
                    message: db_err.message().to_string(),
                }
            }
            _ => SeedError::StoreUnavailable {
                role: StoreRole::Destination,
                operation: "inserting",
                source,
            },
        }
    }
}
