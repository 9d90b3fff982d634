use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A physical examination hall.
///
/// `exam_capacity` models the two-students-per-bench halving rule used by the
/// seating allocator: it defaults to `capacity / 2` (floor) at creation and is
/// thereafter a stored fact, never recomputed per exam. Invariant:
/// `exam_capacity <= capacity`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Hall {
    pub id: String,
    pub hall_number: String,
    pub capacity: i64,
    pub exam_capacity: i64,
    pub columns: i64,
    pub building: String,
    pub floor: i64,
    pub facilities: Vec<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Hall {
    /// Derive the exam capacity when none was supplied: `capacity / 2`, floor.
    #[must_use]
    pub const fn derive_exam_capacity(capacity: i64) -> i64 {
        capacity / 2
    }
}
