use proctor_engine::attendance::AttendanceRequest;
use proctor_engine::ProcessEngine;

use crate::cli::subcommands::AttendanceCommands;
use crate::cli::OutputFormat;
use crate::output;

/// Handle `pct attendance`.
pub async fn handle(
    action: &AttendanceCommands,
    engine: &ProcessEngine,
    format: OutputFormat,
    limit: usize,
) -> anyhow::Result<()> {
    match action {
        AttendanceCommands::Mark {
            timetable,
            register,
            status,
            method,
            by,
            reason,
        } => {
            let record = engine
                .mark_attendance(&AttendanceRequest {
                    timetable_id: timetable.clone(),
                    register_number: register.clone(),
                    status: *status,
                    verification_method: *method,
                    marked_by: by.clone(),
                    reason: reason.clone(),
                })
                .await?;
            output::output(&record, format)
        }
        AttendanceCommands::List { timetable_id } => {
            let mut records = engine.store().list_attendance(timetable_id).await?;
            records.truncate(limit);
            output::output(&records, format)
        }
    }
}
