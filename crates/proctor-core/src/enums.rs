//! Status enums, exam classification, and action types for Proctor.
//!
//! Most enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.
//! `ExamType` and `ExamSession` keep the exact wire strings the scheduling and
//! seating oracles exchange (`"Internal1"`, `"SEM"`, `"FN"`, …). Status enums
//! with state machines provide `allowed_next_states()` to enforce valid
//! transitions at the application layer.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// ExamType
// ---------------------------------------------------------------------------

/// Type of examination cycle.
///
/// Internal exams seat two students per bench; SEM (final-term) exams seat
/// one, and are the only type for which hall tickets are issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum ExamType {
    Internal1,
    Internal2,
    #[serde(rename = "SEM")]
    Sem,
}

impl ExamType {
    /// Return the string representation used in SQL storage and oracle calls.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Internal1 => "Internal1",
            Self::Internal2 => "Internal2",
            Self::Sem => "SEM",
        }
    }

    /// Whether this exam type pairs two students on one bench.
    #[must_use]
    pub const fn is_internal(self) -> bool {
        matches!(self, Self::Internal1 | Self::Internal2)
    }
}

impl fmt::Display for ExamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ExamSession
// ---------------------------------------------------------------------------

/// Daily session an exam runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum ExamSession {
    #[serde(rename = "FN")]
    Forenoon,
    #[serde(rename = "AN")]
    Afternoon,
    Morning,
}

impl ExamSession {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Forenoon => "FN",
            Self::Afternoon => "AN",
            Self::Morning => "Morning",
        }
    }
}

impl fmt::Display for ExamSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ScheduleStatus
// ---------------------------------------------------------------------------

/// Status of an exam schedule through its lifecycle.
///
/// ```text
/// draft → scheduled → in_progress → completed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleStatus {
    Draft,
    Scheduled,
    InProgress,
    Completed,
}

impl ScheduleStatus {
    /// Valid next states from the current state.
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Draft => &[Self::Scheduled],
            Self::Scheduled => &[Self::InProgress],
            Self::InProgress => &[Self::Completed],
            Self::Completed => &[],
        }
    }

    /// Check whether transitioning to `next` is allowed.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Scheduled => "scheduled",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for ScheduleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AttendanceStatus
// ---------------------------------------------------------------------------

/// Attendance status of one student at one timetable slot.
///
/// `absent` is the implicit default for students with no record; an explicit
/// record may hold any of the three values and is updated in place on
/// re-marking, never duplicated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
}

impl AttendanceStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Absent => "absent",
            Self::Late => "late",
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// VerificationMethod
// ---------------------------------------------------------------------------

/// How an attendance record was verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum VerificationMethod {
    QrScan,
    ManualEntry,
}

impl VerificationMethod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::QrScan => "qr-scan",
            Self::ManualEntry => "manual-entry",
        }
    }
}

impl fmt::Display for VerificationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AllocationMethod
// ---------------------------------------------------------------------------

/// How a seating allocation was produced.
///
/// `fallback` marks rows produced by the deterministic local allocator after
/// an oracle failure, so staff can detect and re-run the authoritative
/// allocation later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AllocationMethod {
    Oracle,
    Fallback,
}

impl AllocationMethod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Oracle => "oracle",
            Self::Fallback => "fallback",
        }
    }
}

impl fmt::Display for AllocationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// PersonRole
// ---------------------------------------------------------------------------

/// Role of a person in the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PersonRole {
    Student,
    Faculty,
    Coe,
}

impl PersonRole {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Faculty => "faculty",
            Self::Coe => "coe",
        }
    }
}

impl fmt::Display for PersonRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// EntityType
// ---------------------------------------------------------------------------

/// Type of entity in the system, used in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Schedule,
    TimetableEntry,
    Hall,
    SeatingAllocation,
    HallTicket,
    AttendanceRecord,
    Person,
}

impl EntityType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Schedule => "schedule",
            Self::TimetableEntry => "timetable_entry",
            Self::Hall => "hall",
            Self::SeatingAllocation => "seating_allocation",
            Self::HallTicket => "hall_ticket",
            Self::AttendanceRecord => "attendance_record",
            Self::Person => "person",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AuditAction
// ---------------------------------------------------------------------------

/// Type of action recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Created,
    Updated,
    StatusChanged,
    Authorized,
    Issued,
    DownloadReset,
    Marked,
    Modified,
    Deleted,
}

impl AuditAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::StatusChanged => "status_changed",
            Self::Authorized => "authorized",
            Self::Issued => "issued",
            Self::DownloadReset => "download_reset",
            Self::Marked => "marked",
            Self::Modified => "modified",
            Self::Deleted => "deleted",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // --- Serde roundtrip tests ---

    macro_rules! test_serde_roundtrip {
        ($name:ident, $ty:ty, $variant:expr, $expected_str:expr) => {
            #[test]
            fn $name() {
                let val = $variant;
                let json = serde_json::to_string(&val).unwrap();
                assert_eq!(json, format!("\"{}\"", $expected_str));
                let recovered: $ty = serde_json::from_str(&json).unwrap();
                assert_eq!(recovered, val);
            }
        };
    }

    test_serde_roundtrip!(exam_type_internal1, ExamType, ExamType::Internal1, "Internal1");
    test_serde_roundtrip!(exam_type_sem, ExamType, ExamType::Sem, "SEM");

    test_serde_roundtrip!(session_fn, ExamSession, ExamSession::Forenoon, "FN");
    test_serde_roundtrip!(session_an, ExamSession, ExamSession::Afternoon, "AN");
    test_serde_roundtrip!(session_morning, ExamSession, ExamSession::Morning, "Morning");

    test_serde_roundtrip!(
        schedule_in_progress,
        ScheduleStatus,
        ScheduleStatus::InProgress,
        "in_progress"
    );
    test_serde_roundtrip!(schedule_draft, ScheduleStatus, ScheduleStatus::Draft, "draft");

    test_serde_roundtrip!(
        attendance_present,
        AttendanceStatus,
        AttendanceStatus::Present,
        "present"
    );
    test_serde_roundtrip!(attendance_late, AttendanceStatus, AttendanceStatus::Late, "late");

    test_serde_roundtrip!(
        verification_qr_scan,
        VerificationMethod,
        VerificationMethod::QrScan,
        "qr-scan"
    );
    test_serde_roundtrip!(
        verification_manual,
        VerificationMethod,
        VerificationMethod::ManualEntry,
        "manual-entry"
    );

    test_serde_roundtrip!(
        allocation_fallback,
        AllocationMethod,
        AllocationMethod::Fallback,
        "fallback"
    );

    test_serde_roundtrip!(role_student, PersonRole, PersonRole::Student, "student");
    test_serde_roundtrip!(role_coe, PersonRole, PersonRole::Coe, "coe");

    test_serde_roundtrip!(
        entity_type_hall_ticket,
        EntityType,
        EntityType::HallTicket,
        "hall_ticket"
    );

    test_serde_roundtrip!(
        audit_download_reset,
        AuditAction,
        AuditAction::DownloadReset,
        "download_reset"
    );

    // --- Transition tests ---

    #[test]
    fn schedule_valid_transitions() {
        assert!(ScheduleStatus::Draft.can_transition_to(ScheduleStatus::Scheduled));
        assert!(ScheduleStatus::Scheduled.can_transition_to(ScheduleStatus::InProgress));
        assert!(ScheduleStatus::InProgress.can_transition_to(ScheduleStatus::Completed));
    }

    #[test]
    fn schedule_invalid_transitions() {
        assert!(!ScheduleStatus::Draft.can_transition_to(ScheduleStatus::Completed));
        assert!(!ScheduleStatus::Completed.can_transition_to(ScheduleStatus::Draft));
        assert!(!ScheduleStatus::Scheduled.can_transition_to(ScheduleStatus::Draft));
    }

    #[test]
    fn schedule_completed_is_terminal() {
        assert!(ScheduleStatus::Completed.allowed_next_states().is_empty());
    }

    // --- Classification tests ---

    #[test]
    fn internal_types_pair_benches() {
        assert!(ExamType::Internal1.is_internal());
        assert!(ExamType::Internal2.is_internal());
        assert!(!ExamType::Sem.is_internal());
    }

    // --- Display / as_str tests ---

    #[test]
    fn display_matches_as_str() {
        assert_eq!(format!("{}", ExamType::Sem), "SEM");
        assert_eq!(format!("{}", ExamSession::Forenoon), "FN");
        assert_eq!(format!("{}", ScheduleStatus::InProgress), "in_progress");
        assert_eq!(format!("{}", AttendanceStatus::Late), "late");
        assert_eq!(format!("{}", VerificationMethod::QrScan), "qr-scan");
        assert_eq!(format!("{}", AllocationMethod::Fallback), "fallback");
        assert_eq!(format!("{}", PersonRole::Coe), "coe");
        assert_eq!(format!("{}", EntityType::SeatingAllocation), "seating_allocation");
        assert_eq!(format!("{}", AuditAction::StatusChanged), "status_changed");
    }
}
