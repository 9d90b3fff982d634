//! Store service hosting all repository methods.
//!
//! `ExamStore` wraps `ProctorDb` (raw database access). All repo methods are
//! implemented as `impl ExamStore` blocks in `repos/`. Mutations that the
//! audit trail covers append their audit entry inside the same logical
//! operation.

use crate::ProctorDb;
use crate::error::StoreError;

/// Orchestrates database mutations for exam state.
pub struct ExamStore {
    db: ProctorDb,
}

impl ExamStore {
    /// Create a new store wrapping a local database.
    ///
    /// # Arguments
    ///
    /// * `db_path` — Path to the libSQL database file, or `":memory:"` for tests.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the database cannot be opened.
    pub async fn new_local(db_path: &str) -> Result<Self, StoreError> {
        let db = ProctorDb::open_local(db_path).await?;
        Ok(Self { db })
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &ProctorDb {
        &self.db
    }
}
