use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{ExamSession, ExamType, ScheduleStatus};

/// One examination cycle for a year/semester/exam-type/session.
///
/// Owns (by cascading delete) its timetable entries, seating allocations,
/// hall tickets, and generated artifact files. `hall_tickets_authorized`
/// transitions false→true exactly once, and only for SEM schedules.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Schedule {
    pub id: String,
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
    pub status: ScheduleStatus,
    pub hall_tickets_authorized: bool,
    pub authorized_by: Option<String>,
    pub authorized_at: Option<DateTime<Utc>>,
    pub timetable_pdf_path: Option<String>,
    pub seating_student_pdf_path: Option<String>,
    pub seating_faculty_pdf_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Schedule {
    /// All artifact file paths this schedule references, for cascade delete.
    #[must_use]
    pub fn artifact_paths(&self) -> Vec<&str> {
        [
            self.timetable_pdf_path.as_deref(),
            self.seating_student_pdf_path.as_deref(),
            self.seating_faculty_pdf_path.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}
