//! # proctor-core
//!
//! Core types shared across all Proctor crates:
//! - Entity structs for all domain objects (schedules, timetable entries,
//!   halls, seating allocations, hall tickets, attendance records, people)
//! - Status enums with state machine transitions
//! - ID prefix constants and formatting helpers
//! - Engine/CLI response types

pub mod entities;
pub mod enums;
pub mod ids;
pub mod responses;
