use clap::Subcommand;

use proctor_core::enums::{AttendanceStatus, VerificationMethod};

use crate::cli::parse;

/// Attendance commands.
#[derive(Clone, Debug, Subcommand)]
pub enum AttendanceCommands {
    /// Mark (or correct) one student's attendance at a timetable slot.
    Mark {
        /// Timetable entry ID
        #[arg(long)]
        timetable: String,
        #[arg(long)]
        register: String,
        /// Status: present, absent, late
        #[arg(long, value_parser = parse::attendance_status)]
        status: AttendanceStatus,
        /// Verification method: qr-scan, manual-entry
        #[arg(long, value_parser = parse::verification_method, default_value = "manual-entry")]
        method: VerificationMethod,
        /// Person ID of the marking invigilator
        #[arg(long)]
        by: String,
        /// Reason, required context when correcting an existing record
        #[arg(long)]
        reason: Option<String>,
    },
    /// List attendance records for a timetable slot.
    List { timetable_id: String },
}
