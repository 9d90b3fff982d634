//! Database migration runner.
//!
//! Embeds the SQL migration files at compile time and executes them on
//! database open. All statements use `IF NOT EXISTS` for idempotent re-running.

use crate::ProctorDb;
use crate::error::StoreError;

/// Initial schema: 8 tables, 6 UNIQUE compound indexes.
const MIGRATION_001: &str = include_str!("../migrations/001_initial.sql");

impl ProctorDb {
    /// Run all embedded migrations in sequence.
    pub(crate) async fn run_migrations(&self) -> Result<(), StoreError> {
        tracing::debug!("running migration 001_initial");
        self.conn()
            .execute_batch(MIGRATION_001)
            .await
            .map_err(|e| StoreError::Migration(format!("001_initial: {e}")))?;
        Ok(())
    }
}
