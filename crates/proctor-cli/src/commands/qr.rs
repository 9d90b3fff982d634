use serde_json::json;

use proctor_engine::ProcessEngine;

use crate::cli::subcommands::QrCommands;
use crate::cli::OutputFormat;
use crate::output;

/// Handle `pct qr`.
pub async fn handle(
    action: &QrCommands,
    engine: &ProcessEngine,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match action {
        QrCommands::Verify { payload } => match engine.verify_scan(payload) {
            Some(ticket) => output::output(
                &json!({"valid": true, "ticket": ticket}),
                format,
            ),
            None => output::output(&json!({"valid": false}), format),
        },
        QrCommands::Window { timetable_id } => {
            let window = engine.scan_window(timetable_id).await?;
            output::output(&window, format)
        }
    }
}
