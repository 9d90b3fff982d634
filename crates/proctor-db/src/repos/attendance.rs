//! Attendance repository.
//!
//! One record per `(timetable entry, student)`. Marking twice updates the
//! status but keeps the original `marked_by` / `marked_at` as first-write
//! provenance; the correcting actor lands in the `modified_*` columns.

use chrono::Utc;

use proctor_core::entities::AttendanceRecord;
use proctor_core::enums::{AttendanceStatus, AuditAction, EntityType, VerificationMethod};
use proctor_core::ids::PREFIX_ATTENDANCE;

use crate::error::StoreError;
use crate::helpers::{get_opt_string, parse_datetime, parse_enum, parse_optional_datetime};
use crate::store::ExamStore;

/// One attendance mark to record.
#[derive(Debug, Clone)]
pub struct NewAttendanceMark {
    pub timetable_id: String,
    pub student_id: String,
    pub register_number: String,
    pub status: AttendanceStatus,
    pub verification_method: VerificationMethod,
    pub marked_by: String,
    /// Required context when correcting an existing record; ignored on the
    /// first mark.
    pub modification_reason: Option<String>,
}

const ATTENDANCE_COLUMNS: &str = "id, timetable_id, student_id, register_number, status, \
     verification_method, marked_by, marked_at, modified_by, modified_at, modification_reason";

fn row_to_record(row: &libsql::Row) -> Result<AttendanceRecord, StoreError> {
    Ok(AttendanceRecord {
        id: row.get::<String>(0)?,
        timetable_id: row.get::<String>(1)?,
        student_id: row.get::<String>(2)?,
        register_number: row.get::<String>(3)?,
        status: parse_enum(&row.get::<String>(4)?)?,
        verification_method: parse_enum(&row.get::<String>(5)?)?,
        marked_by: row.get::<String>(6)?,
        marked_at: parse_datetime(&row.get::<String>(7)?)?,
        modified_by: get_opt_string(row, 8)?,
        modified_at: parse_optional_datetime(get_opt_string(row, 9)?.as_deref())?,
        modification_reason: get_opt_string(row, 10)?,
    })
}

impl ExamStore {
    /// Record (or correct) a student's attendance for one timetable entry.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` when the timetable entry does not
    /// exist, and `StoreError::InvalidState` when a different actor corrects
    /// an existing record without giving a modification reason.
    pub async fn mark_attendance(
        &self,
        mark: &NewAttendanceMark,
    ) -> Result<AttendanceRecord, StoreError> {
        self.get_timetable_entry(&mark.timetable_id).await?;
        let now = Utc::now().to_rfc3339();

        if let Some(existing) = self
            .find_attendance(&mark.timetable_id, &mark.student_id)
            .await?
        {
            if mark.marked_by != existing.marked_by && mark.modification_reason.is_none() {
                return Err(StoreError::InvalidState(format!(
                    "attendance for {} was marked by {}; corrections by another actor \
                     require a modification reason",
                    mark.register_number, existing.marked_by
                )));
            }
            self.db()
                .conn()
                .execute(
                    "UPDATE attendance_records SET status = ?1, verification_method = ?2, \
                     modified_by = ?3, modified_at = ?4, modification_reason = ?5 \
                     WHERE id = ?6",
                    libsql::params![
                        mark.status.as_str(),
                        mark.verification_method.as_str(),
                        mark.marked_by.as_str(),
                        now.as_str(),
                        mark.modification_reason.as_deref(),
                        existing.id.as_str()
                    ],
                )
                .await?;
            self.append_audit_for(
                EntityType::AttendanceRecord,
                &existing.id,
                AuditAction::Modified,
                Some(&mark.marked_by),
                Some(serde_json::json!({
                    "from": existing.status.as_str(),
                    "to": mark.status.as_str(),
                    "reason": mark.modification_reason,
                })),
            )
            .await?;
            return self.get_attendance(&existing.id).await;
        }

        let id = self.db().generate_id(PREFIX_ATTENDANCE).await?;
        self.db()
            .conn()
            .execute(
                "INSERT INTO attendance_records (id, timetable_id, student_id, \
                 register_number, status, verification_method, marked_by, marked_at, \
                 modified_by, modified_at, modification_reason) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, NULL, NULL, NULL)",
                libsql::params![
                    id.as_str(),
                    mark.timetable_id.as_str(),
                    mark.student_id.as_str(),
                    mark.register_number.as_str(),
                    mark.status.as_str(),
                    mark.verification_method.as_str(),
                    mark.marked_by.as_str(),
                    now.as_str()
                ],
            )
            .await
            .map_err(StoreError::from_insert)?;

        self.append_audit_for(
            EntityType::AttendanceRecord,
            &id,
            AuditAction::Marked,
            Some(&mark.marked_by),
            None,
        )
        .await?;

        self.get_attendance(&id).await
    }

    /// Fetch one attendance record by ID.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the ID is unknown.
    pub async fn get_attendance(&self, id: &str) -> Result<AttendanceRecord, StoreError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {ATTENDANCE_COLUMNS} FROM attendance_records WHERE id = ?1"),
                [id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => row_to_record(&row),
            None => Err(StoreError::not_found("attendance record", id)),
        }
    }

    /// Look up the record for `(timetable entry, student)`, if one exists.
    pub async fn find_attendance(
        &self,
        timetable_id: &str,
        student_id: &str,
    ) -> Result<Option<AttendanceRecord>, StoreError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {ATTENDANCE_COLUMNS} FROM attendance_records \
                     WHERE timetable_id = ?1 AND student_id = ?2"
                ),
                libsql::params![timetable_id, student_id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => row_to_record(&row).map(Some),
            None => Ok(None),
        }
    }

    /// List all records for one timetable entry, ordered by register number.
    pub async fn list_attendance(
        &self,
        timetable_id: &str,
    ) -> Result<Vec<AttendanceRecord>, StoreError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {ATTENDANCE_COLUMNS} FROM attendance_records \
                     WHERE timetable_id = ?1 ORDER BY register_number"
                ),
                [timetable_id],
            )
            .await?;
        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(row_to_record(&row)?);
        }
        Ok(results)
    }
}
