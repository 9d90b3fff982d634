//! # proctor-db
//!
//! libSQL persistence for Proctor exam state.
//!
//! Handles all relational state: schedules, timetable entries, halls,
//! seating allocations, hall tickets, attendance records, people, and the
//! audit trail. The six UNIQUE compound indexes in the schema enforce the
//! data-model invariants (one seat per slot, one seat per student per
//! schedule, one ticket per student per schedule, one attendance row per
//! slot/student, one schedule per exam cycle).

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod store;

use error::StoreError;
use libsql::Builder;

/// Central database handle for all Proctor state operations.
///
/// Wraps a libSQL database and connection. Provides prefixed ID generation;
/// repository methods live on [`store::ExamStore`].
pub struct ProctorDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl ProctorDb {
    /// Open a local-only database at the given path.
    ///
    /// Runs migrations automatically on first open.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the database cannot be opened or migrations
    /// fail.
    pub async fn open_local(path: &str) -> Result<Self, StoreError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        // Enable foreign keys (must be per-connection in SQLite)
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| StoreError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let proctor_db = Self { db, conn };
        proctor_db.run_migrations().await?;
        Ok(proctor_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Generate a prefixed ID via libSQL. Returns e.g., `"sch-a3f8b2c1"`.
    ///
    /// Uses `randomblob(4)` in SQL to produce 8-char hex, then prepends the prefix.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the query fails or returns no rows.
    pub async fn generate_id(&self, prefix: &str) -> Result<String, StoreError> {
        let mut rows = self
            .conn
            .query(
                &format!("SELECT '{prefix}-' || lower(hex(randomblob(4)))"),
                (),
            )
            .await?;
        let row = rows.next().await?.ok_or(StoreError::NoResult)?;
        Ok(row.get::<String>(0)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proctor_core::ids;
    use std::collections::HashSet;

    async fn test_db() -> ProctorDb {
        ProctorDb::open_local(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn open_local_creates_schema() {
        let db = test_db().await;

        let mut rows = db
            .conn()
            .query(
                "SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name",
                (),
            )
            .await
            .unwrap();

        let mut tables = HashSet::new();
        while let Some(row) = rows.next().await.unwrap() {
            tables.insert(row.get::<String>(0).unwrap());
        }

        for expected in [
            "schedules",
            "timetable_entries",
            "halls",
            "persons",
            "seating_allocations",
            "hall_tickets",
            "attendance_records",
            "audit_trail",
        ] {
            assert!(tables.contains(expected), "missing table {expected}");
        }
    }

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let db = test_db().await;
        db.run_migrations().await.unwrap();
        db.run_migrations().await.unwrap();
    }

    #[tokio::test]
    async fn generate_id_has_prefix_shape() {
        let db = test_db().await;
        let id = db.generate_id(ids::PREFIX_SCHEDULE).await.unwrap();
        assert!(ids::has_prefix(&id, ids::PREFIX_SCHEDULE));
        assert!(id[4..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[tokio::test]
    async fn generated_ids_are_distinct() {
        let db = test_db().await;
        let mut seen = HashSet::new();
        for _ in 0..64 {
            assert!(seen.insert(db.generate_id("tkt").await.unwrap()));
        }
    }
}
