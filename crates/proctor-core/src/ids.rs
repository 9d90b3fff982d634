//! ID prefix constants and formatting helpers.
//!
//! All entity IDs follow the `pfx-xxxxxxxx` shape: a three-letter prefix,
//! a hyphen, and 8 lowercase hex characters. The hex portion is generated
//! SQL-side (`randomblob(4)`) by `proctor-db`.

/// Prefix for exam schedule IDs (`sch-a3f8b2c1`).
pub const PREFIX_SCHEDULE: &str = "sch";
/// Prefix for timetable entry IDs.
pub const PREFIX_TIMETABLE: &str = "tte";
/// Prefix for hall IDs.
pub const PREFIX_HALL: &str = "hal";
/// Prefix for seating allocation IDs.
pub const PREFIX_SEATING: &str = "sea";
/// Prefix for hall ticket IDs.
pub const PREFIX_TICKET: &str = "tkt";
/// Prefix for attendance record IDs.
pub const PREFIX_ATTENDANCE: &str = "att";
/// Prefix for person (student/staff) IDs.
pub const PREFIX_PERSON: &str = "per";
/// Prefix for audit trail entry IDs.
pub const PREFIX_AUDIT: &str = "aud";

/// Check whether an ID string carries the given prefix.
#[must_use]
pub fn has_prefix(id: &str, prefix: &str) -> bool {
    id.len() == prefix.len() + 9 && id.starts_with(prefix) && id.as_bytes()[prefix.len()] == b'-'
}
