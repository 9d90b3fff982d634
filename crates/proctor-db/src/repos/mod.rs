//! Repository modules implementing CRUD operations for all Proctor entities.
//!
//! Each module adds methods to `ExamStore` via `impl ExamStore` blocks.

pub mod attendance;
pub mod audit;
pub mod hall;
pub mod person;
pub mod schedule;
pub mod seating;
pub mod ticket;
pub mod timetable;
