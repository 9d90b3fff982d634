use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::AllocationMethod;

/// One student's hall/seat assignment for a schedule.
///
/// The tuple `(schedule, hall, seat_number)` is unique — two students never
/// share a physical seat slot in the same schedule — and each student holds at
/// most one seat per schedule (seating is date-invariant per schedule).
/// `is_left_seat` is meaningful only when two students share a bench
/// (Internal exams); it is `None` for SEM exams, where benches are
/// single-occupant.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SeatingAllocation {
    pub id: String,
    pub schedule_id: String,
    pub timetable_id: Option<String>,
    pub hall_id: String,
    pub hall_number: String,
    pub seat_number: i64,
    pub student_id: String,
    pub register_number: String,
    pub is_left_seat: Option<bool>,
    pub allocation_method: AllocationMethod,
    pub created_at: DateTime<Utc>,
}
