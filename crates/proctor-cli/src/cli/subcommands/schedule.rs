use chrono::NaiveDate;
use clap::{Args, Subcommand};

use proctor_core::enums::{ExamSession, ExamType, ScheduleStatus};

use crate::cli::parse;

/// Schedule commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ScheduleCommands {
    /// Create a schedule and run the full pipeline (timetable, seating, PDFs).
    Create(ScheduleCreateArgs),
    /// List all schedules.
    List,
    /// Show a schedule with its timetable and seating.
    Show { id: String },
    /// Advance a schedule's lifecycle status.
    Status {
        id: String,
        /// Target status: scheduled, in_progress, completed
        #[arg(value_parser = parse::schedule_status)]
        status: ScheduleStatus,
    },
    /// Delete a schedule, its dependent rows, and its generated files.
    Delete { id: String },
}

#[derive(Clone, Debug, Args)]
pub struct ScheduleCreateArgs {
    /// Academic year, e.g. 2025-2026
    #[arg(long)]
    pub academic_year: String,

    /// Exam type: internal1, internal2, sem
    #[arg(long, value_parser = parse::exam_type)]
    pub exam_type: ExamType,

    /// Year of study the cycle covers
    #[arg(long)]
    pub year: i64,

    /// Semester number
    #[arg(long)]
    pub semester: i64,

    /// Daily session: fn, an, morning
    #[arg(long, value_parser = parse::exam_session)]
    pub session: ExamSession,

    /// First exam date (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: NaiveDate,

    /// Last exam date (YYYY-MM-DD)
    #[arg(long)]
    pub end_date: NaiveDate,

    /// Holiday within the window; repeat for multiple
    #[arg(long = "holiday")]
    pub holidays: Vec<NaiveDate>,

    /// Hall ID or hall number; repeat for multiple
    #[arg(long = "hall", required = true)]
    pub halls: Vec<String>,

    /// Invigilator person ID; repeat for multiple
    #[arg(long = "faculty")]
    pub faculty: Vec<String>,
}
