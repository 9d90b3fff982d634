use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{AttendanceStatus, VerificationMethod};

/// One attendance record per `(timetable entry, student)`.
///
/// Marking twice updates, never duplicates. The original `marked_by` /
/// `marked_at` are first-write provenance and survive later corrections;
/// a correcting actor populates `modified_by` / `modified_at` /
/// `modification_reason` instead.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AttendanceRecord {
    pub id: String,
    pub timetable_id: String,
    pub student_id: String,
    pub register_number: String,
    pub status: AttendanceStatus,
    pub verification_method: VerificationMethod,
    pub marked_by: String,
    pub marked_at: DateTime<Utc>,
    pub modified_by: Option<String>,
    pub modified_at: Option<DateTime<Utc>>,
    pub modification_reason: Option<String>,
}
