use proctor_db::repos::hall::NewHall;
use proctor_engine::ProcessEngine;

use crate::cli::subcommands::HallCommands;
use crate::cli::OutputFormat;
use crate::output;

/// Handle `pct hall`.
pub async fn handle(
    action: &HallCommands,
    engine: &ProcessEngine,
    format: OutputFormat,
    limit: usize,
) -> anyhow::Result<()> {
    match action {
        HallCommands::Add {
            number,
            capacity,
            exam_capacity,
            columns,
            building,
            floor,
            facilities,
        } => {
            let hall = engine
                .store()
                .create_hall(&NewHall {
                    hall_number: number.clone(),
                    capacity: *capacity,
                    exam_capacity: *exam_capacity,
                    columns: *columns,
                    building: building.clone(),
                    floor: *floor,
                    facilities: facilities.clone(),
                })
                .await?;
            output::output(&hall, format)
        }
        HallCommands::List { all } => {
            let mut halls = engine.store().list_halls(!all).await?;
            halls.truncate(limit);
            output::output(&halls, format)
        }
    }
}
