use clap::Subcommand;

use crate::cli::subcommands::{
    AttendanceCommands, HallCommands, QrCommands, ScheduleCommands, StudentCommands,
    TicketCommands,
};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Exam schedules and the orchestration pipeline.
    Schedule {
        #[command(subcommand)]
        action: ScheduleCommands,
    },
    /// Examination halls.
    Hall {
        #[command(subcommand)]
        action: HallCommands,
    },
    /// Students and staff.
    Student {
        #[command(subcommand)]
        action: StudentCommands,
    },
    /// Hall ticket authorization and issuance.
    Ticket {
        #[command(subcommand)]
        action: TicketCommands,
    },
    /// Attendance marking.
    Attendance {
        #[command(subcommand)]
        action: AttendanceCommands,
    },
    /// QR verification and scan windows.
    Qr {
        #[command(subcommand)]
        action: QrCommands,
    },
}
