//! Subprocess adapters for the external scheduling, seating, and artifact
//! oracles.
//!
//! Each oracle is a black-box script invoked as
//! `<interpreter> <script> <op> <json-params>`; it must print a single JSON
//! object on stdout. Non-zero exit, a timeout, or non-JSON stdout is a hard
//! failure of that call with the captured stderr attached.
//!
//! Orchestration code depends on the `TimetableOracle` / `SeatingOracle` /
//! `ArtifactOracle` traits, not on the process implementations, so the
//! pipeline is testable with scripted in-process fakes.

pub mod artifacts;
pub mod error;
pub mod scheduling;
pub mod seating;
mod transport;

pub use artifacts::{ArtifactOracle, ProcessArtifactOracle};
pub use error::OracleError;
pub use scheduling::{ProcessTimetableOracle, TimetableOracle};
pub use seating::{ProcessSeatingOracle, SeatingOracle, fallback_allocation};
