//! Timetable entry repository.
//!
//! Entries are created in bulk from one scheduling oracle response. The bulk
//! insert is transactional: either every entry lands or none does, so a
//! failed scheduling call never leaves a partial timetable behind.

use chrono::{NaiveDate, Utc};

use proctor_core::entities::TimetableEntry;
use proctor_core::ids::PREFIX_TIMETABLE;

use crate::error::StoreError;
use crate::helpers::{parse_date, parse_datetime, parse_string_list, to_json_list};
use crate::store::ExamStore;

/// One normalized timetable entry from the scheduling oracle, before
/// persistence assigns IDs and timestamps.
#[derive(Debug, Clone)]
pub struct NewTimetableEntry {
    pub subject_code: String,
    pub subject_name: String,
    pub date: NaiveDate,
    pub time_start: String,
    pub time_end: String,
    pub halls: Vec<String>,
    pub invigilators: Vec<String>,
    pub violations: Vec<String>,
}

fn row_to_entry(row: &libsql::Row) -> Result<TimetableEntry, StoreError> {
    Ok(TimetableEntry {
        id: row.get::<String>(0)?,
        schedule_id: row.get::<String>(1)?,
        subject_code: row.get::<String>(2)?,
        subject_name: row.get::<String>(3)?,
        date: parse_date(&row.get::<String>(4)?)?,
        time_start: row.get::<String>(5)?,
        time_end: row.get::<String>(6)?,
        halls: parse_string_list(&row.get::<String>(7)?)?,
        invigilators: parse_string_list(&row.get::<String>(8)?)?,
        violations: parse_string_list(&row.get::<String>(9)?)?,
        created_at: parse_datetime(&row.get::<String>(10)?)?,
    })
}

const TIMETABLE_COLUMNS: &str = "id, schedule_id, subject_code, subject_name, date, \
     time_start, time_end, halls, invigilators, violations, created_at";

impl ExamStore {
    /// Insert all entries of one scheduling response, all-or-nothing.
    ///
    /// # Errors
    ///
    /// Any insert failure rolls the whole batch back.
    pub async fn insert_timetable_bulk(
        &self,
        schedule_id: &str,
        entries: &[NewTimetableEntry],
    ) -> Result<Vec<TimetableEntry>, StoreError> {
        let now = Utc::now();
        let mut ids = Vec::with_capacity(entries.len());
        for _ in entries {
            ids.push(self.db().generate_id(PREFIX_TIMETABLE).await?);
        }

        let tx = self.db().conn().transaction().await?;
        for (entry, id) in entries.iter().zip(&ids) {
            tx.execute(
                "INSERT INTO timetable_entries (id, schedule_id, subject_code, subject_name, \
                 date, time_start, time_end, halls, invigilators, violations, created_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                libsql::params![
                    id.as_str(),
                    schedule_id,
                    entry.subject_code.as_str(),
                    entry.subject_name.as_str(),
                    entry.date.to_string(),
                    entry.time_start.as_str(),
                    entry.time_end.as_str(),
                    to_json_list(&entry.halls)?,
                    to_json_list(&entry.invigilators)?,
                    to_json_list(&entry.violations)?,
                    now.to_rfc3339()
                ],
            )
            .await
            .map_err(StoreError::from_insert)?;
        }
        tx.commit().await?;

        self.list_timetable(schedule_id).await
    }

    /// Fetch one timetable entry by ID.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the ID is unknown.
    pub async fn get_timetable_entry(&self, id: &str) -> Result<TimetableEntry, StoreError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {TIMETABLE_COLUMNS} FROM timetable_entries WHERE id = ?1"),
                [id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => row_to_entry(&row),
            None => Err(StoreError::not_found("timetable_entry", id)),
        }
    }

    /// List a schedule's timetable entries, date then start time order.
    pub async fn list_timetable(
        &self,
        schedule_id: &str,
    ) -> Result<Vec<TimetableEntry>, StoreError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {TIMETABLE_COLUMNS} FROM timetable_entries \
                     WHERE schedule_id = ?1 ORDER BY date ASC, time_start ASC"
                ),
                [schedule_id],
            )
            .await?;
        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(row_to_entry(&row)?);
        }
        Ok(results)
    }
}
