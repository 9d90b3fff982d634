//! Schedule repository.
//!
//! Manages schedule lifecycle: creation, status transitions, hall-ticket
//! authorization, artifact path recording, and the explicit cascade delete
//! that removes every dependent row.

use chrono::{NaiveDate, Utc};

use proctor_core::entities::Schedule;
use proctor_core::enums::{
    AuditAction, EntityType, ExamSession, ExamType, ScheduleStatus,
};
use proctor_core::ids::PREFIX_SCHEDULE;

use crate::error::StoreError;
use crate::helpers::{
    get_opt_string, parse_date, parse_date_list, parse_datetime, parse_enum,
    parse_optional_datetime, parse_string_list, to_json_list,
};
use crate::store::ExamStore;

/// Parameters for creating a schedule. Validation of date ordering and
/// holiday containment happens in `proctor-engine` before any oracle call;
/// the store enforces uniqueness of the exam cycle.
#[derive(Debug, Clone)]
pub struct NewSchedule {
    pub academic_year: String,
    pub exam_type: ExamType,
    pub year: i64,
    pub semester: i64,
    pub session: ExamSession,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub holidays: Vec<NaiveDate>,
    pub selected_faculty: Vec<String>,
    pub selected_halls: Vec<String>,
}

/// Row counts removed by a cascade delete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CascadeCounts {
    pub timetable_entries: u64,
    pub seating_allocations: u64,
    pub hall_tickets: u64,
    pub attendance_records: u64,
}

fn row_to_schedule(row: &libsql::Row) -> Result<Schedule, StoreError> {
    Ok(Schedule {
        id: row.get::<String>(0)?,
        academic_year: row.get::<String>(1)?,
        exam_type: parse_enum(&row.get::<String>(2)?)?,
        year: row.get::<i64>(3)?,
        semester: row.get::<i64>(4)?,
        session: parse_enum(&row.get::<String>(5)?)?,
        start_date: parse_date(&row.get::<String>(6)?)?,
        end_date: parse_date(&row.get::<String>(7)?)?,
        holidays: parse_date_list(&row.get::<String>(8)?)?,
        selected_faculty: parse_string_list(&row.get::<String>(9)?)?,
        selected_halls: parse_string_list(&row.get::<String>(10)?)?,
        status: parse_enum(&row.get::<String>(11)?)?,
        hall_tickets_authorized: row.get::<i64>(12)? != 0,
        authorized_by: get_opt_string(row, 13)?,
        authorized_at: parse_optional_datetime(row.get::<Option<String>>(14)?.as_deref())?,
        timetable_pdf_path: get_opt_string(row, 15)?,
        seating_student_pdf_path: get_opt_string(row, 16)?,
        seating_faculty_pdf_path: get_opt_string(row, 17)?,
        created_at: parse_datetime(&row.get::<String>(18)?)?,
        updated_at: parse_datetime(&row.get::<String>(19)?)?,
    })
}

const SCHEDULE_COLUMNS: &str = "id, academic_year, exam_type, year, semester, session, \
     start_date, end_date, holidays, selected_faculty, selected_halls, status, \
     hall_tickets_authorized, authorized_by, authorized_at, timetable_pdf_path, \
     seating_student_pdf_path, seating_faculty_pdf_path, created_at, updated_at";

impl ExamStore {
    /// Create a schedule in `Draft` status.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` if a schedule for the same
    /// `(academic_year, exam_type, year, semester)` cycle already exists.
    pub async fn create_schedule(&self, new: &NewSchedule) -> Result<Schedule, StoreError> {
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_SCHEDULE).await?;
        let holidays: Vec<String> = new.holidays.iter().map(ToString::to_string).collect();

        self.db()
            .conn()
            .execute(
                "INSERT INTO schedules (id, academic_year, exam_type, year, semester, session, \
                 start_date, end_date, holidays, selected_faculty, selected_halls, status, \
                 hall_tickets_authorized, created_at, updated_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, 'draft', 0, ?12, ?12)",
                libsql::params![
                    id.as_str(),
                    new.academic_year.as_str(),
                    new.exam_type.as_str(),
                    new.year,
                    new.semester,
                    new.session.as_str(),
                    new.start_date.to_string(),
                    new.end_date.to_string(),
                    to_json_list(&holidays)?,
                    to_json_list(&new.selected_faculty)?,
                    to_json_list(&new.selected_halls)?,
                    now.to_rfc3339()
                ],
            )
            .await
            .map_err(StoreError::from_insert)?;

        self.append_audit_for(EntityType::Schedule, &id, AuditAction::Created, None, None)
            .await?;

        self.get_schedule(&id).await
    }

    /// Fetch one schedule by ID.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the ID is unknown.
    pub async fn get_schedule(&self, id: &str) -> Result<Schedule, StoreError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SCHEDULE_COLUMNS} FROM schedules WHERE id = ?1"),
                [id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => row_to_schedule(&row),
            None => Err(StoreError::not_found("schedule", id)),
        }
    }

    /// List all schedules, newest first.
    pub async fn list_schedules(&self) -> Result<Vec<Schedule>, StoreError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SCHEDULE_COLUMNS} FROM schedules ORDER BY created_at DESC"),
                (),
            )
            .await?;
        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(row_to_schedule(&row)?);
        }
        Ok(results)
    }

    /// Transition a schedule's status.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidState` if the transition is not allowed by
    /// the `ScheduleStatus` state machine.
    pub async fn set_schedule_status(
        &self,
        id: &str,
        next: ScheduleStatus,
    ) -> Result<Schedule, StoreError> {
        let current = self.get_schedule(id).await?;

        if !current.status.can_transition_to(next) {
            return Err(StoreError::InvalidState(format!(
                "Cannot transition schedule {id} from {} to {next}",
                current.status
            )));
        }

        let now = Utc::now();
        self.db()
            .conn()
            .execute(
                "UPDATE schedules SET status = ?1, updated_at = ?2 WHERE id = ?3",
                libsql::params![next.as_str(), now.to_rfc3339(), id],
            )
            .await?;

        self.append_audit_for(
            EntityType::Schedule,
            id,
            AuditAction::StatusChanged,
            None,
            Some(serde_json::json!({
                "from": current.status.as_str(),
                "to": next.as_str(),
            })),
        )
        .await?;

        Ok(Schedule {
            status: next,
            updated_at: now,
            ..current
        })
    }

    /// Authorize hall ticket issuance for a SEM schedule.
    ///
    /// The flag only ever transitions false→true; repeating the action is
    /// rejected rather than silently re-stamped, so `authorized_by`/`at`
    /// always name the original authorizer.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidState` if the schedule is not SEM-type or
    /// is already authorized.
    pub async fn authorize_hall_tickets(
        &self,
        id: &str,
        actor: &str,
    ) -> Result<Schedule, StoreError> {
        let current = self.get_schedule(id).await?;

        if current.exam_type != ExamType::Sem {
            return Err(StoreError::InvalidState(format!(
                "Hall tickets are only issued for SEM exams (schedule {id} is {})",
                current.exam_type
            )));
        }
        if current.hall_tickets_authorized {
            return Err(StoreError::InvalidState(format!(
                "Schedule {id} hall tickets already authorized"
            )));
        }

        let now = Utc::now();
        self.db()
            .conn()
            .execute(
                "UPDATE schedules SET hall_tickets_authorized = 1, authorized_by = ?1, \
                 authorized_at = ?2, updated_at = ?2 WHERE id = ?3",
                libsql::params![actor, now.to_rfc3339(), id],
            )
            .await?;

        self.append_audit_for(
            EntityType::Schedule,
            id,
            AuditAction::Authorized,
            Some(actor),
            None,
        )
        .await?;

        Ok(Schedule {
            hall_tickets_authorized: true,
            authorized_by: Some(actor.to_string()),
            authorized_at: Some(now),
            updated_at: now,
            ..current
        })
    }

    /// Record generated artifact paths on the schedule.
    ///
    /// `None` arguments leave the existing value in place.
    pub async fn set_schedule_artifacts(
        &self,
        id: &str,
        timetable_pdf: Option<&str>,
        seating_student_pdf: Option<&str>,
        seating_faculty_pdf: Option<&str>,
    ) -> Result<(), StoreError> {
        let now = Utc::now();
        self.db()
            .conn()
            .execute(
                "UPDATE schedules SET \
                 timetable_pdf_path = COALESCE(?1, timetable_pdf_path), \
                 seating_student_pdf_path = COALESCE(?2, seating_student_pdf_path), \
                 seating_faculty_pdf_path = COALESCE(?3, seating_faculty_pdf_path), \
                 updated_at = ?4 WHERE id = ?5",
                libsql::params![
                    timetable_pdf,
                    seating_student_pdf,
                    seating_faculty_pdf,
                    now.to_rfc3339(),
                    id
                ],
            )
            .await?;
        Ok(())
    }

    /// Delete a schedule and every dependent row in one transaction.
    ///
    /// Dependents are enumerated explicitly — attendance rows via the
    /// schedule's timetable entries, then hall tickets, seating allocations,
    /// timetable entries, and finally the schedule itself. Artifact file
    /// removal is the caller's job (`proctor-engine`), since the store does
    /// not touch the filesystem.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the schedule does not exist.
    pub async fn delete_schedule_cascade(&self, id: &str) -> Result<CascadeCounts, StoreError> {
        // Existence check up front so a bad ID is a NotFound, not a no-op.
        self.get_schedule(id).await?;

        let tx = self.db().conn().transaction().await?;

        let attendance_records = tx
            .execute(
                "DELETE FROM attendance_records WHERE timetable_id IN \
                 (SELECT id FROM timetable_entries WHERE schedule_id = ?1)",
                [id],
            )
            .await?;
        let hall_tickets = tx
            .execute("DELETE FROM hall_tickets WHERE schedule_id = ?1", [id])
            .await?;
        let seating_allocations = tx
            .execute("DELETE FROM seating_allocations WHERE schedule_id = ?1", [id])
            .await?;
        let timetable_entries = tx
            .execute("DELETE FROM timetable_entries WHERE schedule_id = ?1", [id])
            .await?;
        tx.execute("DELETE FROM schedules WHERE id = ?1", [id]).await?;

        tx.commit().await?;

        self.append_audit_for(EntityType::Schedule, id, AuditAction::Deleted, None, None)
            .await?;

        Ok(CascadeCounts {
            timetable_entries,
            seating_allocations,
            hall_tickets,
            attendance_records,
        })
    }
}
