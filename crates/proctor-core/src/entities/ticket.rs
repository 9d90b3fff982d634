use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A student's signed admission credential for a schedule.
///
/// Unique per `(student, schedule)`. `authorized` is set true only by an
/// explicit COE action against a SEM schedule whose `hall_tickets_authorized`
/// flag is set. Once `downloaded`, a ticket is immutable except through an
/// explicit download reset.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct HallTicket {
    pub id: String,
    pub student_id: String,
    pub schedule_id: String,
    pub register_number: String,
    pub qr_code_data: String,
    pub pdf_path: Option<String>,
    pub authorized: bool,
    pub authorized_by: Option<String>,
    pub authorized_at: Option<DateTime<Utc>>,
    pub downloaded: bool,
    pub downloaded_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
