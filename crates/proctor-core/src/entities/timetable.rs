use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One subject's date/time/hall/invigilator assignment within a schedule.
///
/// Entries are created in bulk from one scheduling oracle response, never
/// partially. `violations` text returned by the oracle is preserved verbatim
/// and surfaced to the COE — never silently dropped.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TimetableEntry {
    pub id: String,
    pub schedule_id: String,
    pub subject_code: String,
    pub subject_name: String,
    pub date: NaiveDate,
    pub time_start: String,
    pub time_end: String,
    pub halls: Vec<String>,
    pub invigilators: Vec<String>,
    pub violations: Vec<String>,
    pub created_at: DateTime<Utc>,
}
