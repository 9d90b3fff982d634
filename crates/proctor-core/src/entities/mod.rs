//! Entity structs for all Proctor domain objects.
//!
//! Each entity maps to a table in the libSQL database (see
//! `proctor-db/migrations/001_initial.sql`). All structs derive `Serialize`,
//! `Deserialize`, and `JsonSchema` for JSON roundtrip and schema validation.

mod attendance;
mod audit;
mod hall;
mod person;
mod schedule;
mod seating;
mod ticket;
mod timetable;

pub use attendance::AttendanceRecord;
pub use audit::AuditEntry;
pub use hall::Hall;
pub use person::Person;
pub use schedule::Schedule;
pub use seating::SeatingAllocation;
pub use ticket::HallTicket;
pub use timetable::TimetableEntry;
