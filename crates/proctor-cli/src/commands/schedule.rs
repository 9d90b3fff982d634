use serde_json::json;

use proctor_db::error::StoreError;
use proctor_engine::ProcessEngine;
use proctor_engine::pipeline::ScheduleRequest;

use crate::cli::subcommands::{ScheduleCommands, ScheduleCreateArgs};
use crate::cli::OutputFormat;
use crate::output;

/// Handle `pct schedule`.
pub async fn handle(
    action: &ScheduleCommands,
    engine: &ProcessEngine,
    format: OutputFormat,
    limit: usize,
) -> anyhow::Result<()> {
    match action {
        ScheduleCommands::Create(args) => {
            let request = build_request(args, engine).await?;
            let report = engine.run_schedule_pipeline(&request).await?;
            output::output(&report, format)
        }
        ScheduleCommands::List => {
            let mut schedules = engine.store().list_schedules().await?;
            schedules.truncate(limit);
            output::output(&schedules, format)
        }
        ScheduleCommands::Show { id } => {
            let schedule = engine.store().get_schedule(id).await?;
            let timetable = engine.store().list_timetable(id).await?;
            let seating = engine.store().list_seating(id).await?;
            output::output(
                &json!({
                    "schedule": schedule,
                    "timetable": timetable,
                    "seating": seating,
                }),
                format,
            )
        }
        ScheduleCommands::Status { id, status } => {
            let schedule = engine.store().set_schedule_status(id, *status).await?;
            output::output(&schedule, format)
        }
        ScheduleCommands::Delete { id } => {
            let report = engine.delete_schedule(id).await?;
            output::output(&report, format)
        }
    }
}

/// Resolve `--hall` values (IDs or hall numbers) and assemble the pipeline
/// request.
async fn build_request(
    args: &ScheduleCreateArgs,
    engine: &ProcessEngine,
) -> anyhow::Result<ScheduleRequest> {
    let mut hall_ids = Vec::with_capacity(args.halls.len());
    for hall_ref in &args.halls {
        let hall = match engine.store().get_hall(hall_ref).await {
            Ok(hall) => hall,
            Err(StoreError::NotFound { .. }) => {
                engine.store().get_hall_by_number(hall_ref).await?
            }
            Err(e) => return Err(e.into()),
        };
        hall_ids.push(hall.id);
    }

    Ok(ScheduleRequest {
        academic_year: args.academic_year.clone(),
        exam_type: args.exam_type,
        year: args.year,
        semester: args.semester,
        session: args.session,
        start_date: args.start_date,
        end_date: args.end_date,
        holidays: args.holidays.clone(),
        selected_faculty: args.faculty.clone(),
        selected_halls: hall_ids,
    })
}
