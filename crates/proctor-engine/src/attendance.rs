//! Attendance marking and QR scan checks.

use chrono::{NaiveDateTime, NaiveTime, TimeZone, Utc};
use tracing::info;

use proctor_core::entities::AttendanceRecord;
use proctor_core::enums::{AttendanceStatus, VerificationMethod};
use proctor_db::repos::attendance::NewAttendanceMark;
use proctor_oracle::{ArtifactOracle, SeatingOracle, TimetableOracle};
use proctor_qr::{ScanWindow, TicketPayload, scan_window_status};

use crate::Engine;
use crate::error::EngineError;

/// One attendance mark as the CLI submits it.
#[derive(Debug, Clone)]
pub struct AttendanceRequest {
    pub timetable_id: String,
    pub register_number: String,
    pub status: AttendanceStatus,
    pub verification_method: VerificationMethod,
    pub marked_by: String,
    /// Required context when correcting an existing record.
    pub reason: Option<String>,
}

impl<T, S, A> Engine<T, S, A>
where
    T: TimetableOracle,
    S: SeatingOracle,
    A: ArtifactOracle,
{
    /// Record a student's attendance for one timetable entry. Marking twice
    /// updates the record; the first marker's provenance survives.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::NotFound` for an unknown timetable entry or
    /// when no active student carries the register number, and
    /// `EngineError::Validation` when a different actor corrects an existing
    /// record without a reason.
    pub async fn mark_attendance(
        &self,
        request: &AttendanceRequest,
    ) -> Result<AttendanceRecord, EngineError> {
        let student = self
            .store()
            .find_student_by_register_number(&request.register_number)
            .await?;

        let record = self
            .store()
            .mark_attendance(&NewAttendanceMark {
                timetable_id: request.timetable_id.clone(),
                student_id: student.id,
                register_number: request.register_number.clone(),
                status: request.status,
                verification_method: request.verification_method,
                marked_by: request.marked_by.clone(),
                modification_reason: request.reason.clone(),
            })
            .await?;
        info!(
            timetable_id = %request.timetable_id,
            register_number = %request.register_number,
            status = %request.status,
            "attendance marked"
        );
        Ok(record)
    }

    /// Verify a scanned QR string against the configured signing secret and
    /// return its payload when authentic. Fails closed: any tamper or parse
    /// problem yields `None`.
    #[must_use]
    pub fn verify_scan(&self, qr: &str) -> Option<TicketPayload> {
        self.signer().verify_and_decode(qr)
    }

    /// Where "now" sits relative to a timetable entry's scan window.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::NotFound` for an unknown entry and
    /// `EngineError::Validation` when its start time is malformed.
    pub async fn scan_window(&self, timetable_id: &str) -> Result<ScanWindow, EngineError> {
        let entry = self.store().get_timetable_entry(timetable_id).await?;
        let time = NaiveTime::parse_from_str(&entry.time_start, "%H:%M").map_err(|e| {
            EngineError::Validation(format!(
                "timetable entry {timetable_id} has unparseable start time {}: {e}",
                entry.time_start
            ))
        })?;
        let exam_start = Utc.from_utc_datetime(&NaiveDateTime::new(entry.date, time));
        Ok(scan_window_status(
            exam_start,
            Utc::now(),
            self.config().general.scan_window_minutes,
        ))
    }
}
