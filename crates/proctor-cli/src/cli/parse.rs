//! Value parsers for domain enums on the command line.
//!
//! Accepted spellings are case-insensitive and match the stored wire strings
//! (`internal1`, `sem`, `fn`, `qr-scan`, …).

use proctor_core::enums::{
    AttendanceStatus, ExamSession, ExamType, PersonRole, ScheduleStatus, VerificationMethod,
};

pub fn exam_type(s: &str) -> Result<ExamType, String> {
    match s.to_ascii_lowercase().as_str() {
        "internal1" => Ok(ExamType::Internal1),
        "internal2" => Ok(ExamType::Internal2),
        "sem" => Ok(ExamType::Sem),
        other => Err(format!(
            "unknown exam type '{other}' (expected internal1, internal2, or sem)"
        )),
    }
}

pub fn exam_session(s: &str) -> Result<ExamSession, String> {
    match s.to_ascii_lowercase().as_str() {
        "fn" | "forenoon" => Ok(ExamSession::Forenoon),
        "an" | "afternoon" => Ok(ExamSession::Afternoon),
        "morning" => Ok(ExamSession::Morning),
        other => Err(format!(
            "unknown session '{other}' (expected fn, an, or morning)"
        )),
    }
}

pub fn schedule_status(s: &str) -> Result<ScheduleStatus, String> {
    match s.to_ascii_lowercase().as_str() {
        "draft" => Ok(ScheduleStatus::Draft),
        "scheduled" => Ok(ScheduleStatus::Scheduled),
        "in_progress" | "in-progress" => Ok(ScheduleStatus::InProgress),
        "completed" => Ok(ScheduleStatus::Completed),
        other => Err(format!(
            "unknown status '{other}' (expected draft, scheduled, in_progress, or completed)"
        )),
    }
}

pub fn attendance_status(s: &str) -> Result<AttendanceStatus, String> {
    match s.to_ascii_lowercase().as_str() {
        "present" => Ok(AttendanceStatus::Present),
        "absent" => Ok(AttendanceStatus::Absent),
        "late" => Ok(AttendanceStatus::Late),
        other => Err(format!(
            "unknown attendance status '{other}' (expected present, absent, or late)"
        )),
    }
}

pub fn verification_method(s: &str) -> Result<VerificationMethod, String> {
    match s.to_ascii_lowercase().as_str() {
        "qr-scan" | "qr" => Ok(VerificationMethod::QrScan),
        "manual-entry" | "manual" => Ok(VerificationMethod::ManualEntry),
        other => Err(format!(
            "unknown verification method '{other}' (expected qr-scan or manual-entry)"
        )),
    }
}

pub fn person_role(s: &str) -> Result<PersonRole, String> {
    match s.to_ascii_lowercase().as_str() {
        "student" => Ok(PersonRole::Student),
        "faculty" => Ok(PersonRole::Faculty),
        "coe" => Ok(PersonRole::Coe),
        other => Err(format!(
            "unknown role '{other}' (expected student, faculty, or coe)"
        )),
    }
}
