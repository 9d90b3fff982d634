//! Database error types for proctor-db.

use thiserror::Error;

/// Errors from store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A SQL query failed.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// Entity lookup returned no result.
    #[error("Not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// A UNIQUE constraint was violated (duplicate seat, ticket, schedule, …).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Invalid state encountered (bad data, disallowed transition).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StoreError {
    /// Map a libSQL error, turning UNIQUE-constraint failures into `Conflict`.
    ///
    /// Inserts that the data model guards with a UNIQUE index use this instead
    /// of the blanket `From` so callers can distinguish duplicates from
    /// infrastructure failures.
    #[must_use]
    pub fn from_insert(e: libsql::Error) -> Self {
        let msg = e.to_string();
        if msg.contains("UNIQUE constraint failed") {
            Self::Conflict(msg)
        } else {
            Self::LibSql(e)
        }
    }

    /// Convenience constructor for not-found lookups.
    #[must_use]
    pub fn not_found(entity_type: &str, id: &str) -> Self {
        Self::NotFound {
            entity_type: entity_type.to_string(),
            id: id.to_string(),
        }
    }
}
