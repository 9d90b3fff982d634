use proctor_engine::ProcessEngine;

use crate::cli::subcommands::TicketCommands;
use crate::cli::OutputFormat;
use crate::output;

/// Handle `pct ticket`.
pub async fn handle(
    action: &TicketCommands,
    engine: &ProcessEngine,
    format: OutputFormat,
    limit: usize,
) -> anyhow::Result<()> {
    match action {
        TicketCommands::Authorize { schedule_id, by } => {
            let report = engine.authorize_hall_tickets(schedule_id, by).await?;
            output::output(&report, format)
        }
        TicketCommands::Issue {
            schedule_id,
            register_number,
            by,
        } => {
            let response = engine.issue_ticket(schedule_id, register_number, by).await?;
            output::output(&response, format)
        }
        TicketCommands::IssueBulk { schedule_id, year } => {
            let report = engine.issue_bulk(schedule_id, *year).await?;
            output::output(&report, format)
        }
        TicketCommands::List { schedule_id } => {
            let mut tickets = engine.store().list_tickets(schedule_id).await?;
            tickets.truncate(limit);
            output::output(&tickets, format)
        }
        TicketCommands::Download { ticket_id } => {
            let download = engine.download_ticket(ticket_id).await?;
            output::output(
                &serde_json::json!({
                    "path": download.path,
                    "ticket": download.ticket,
                }),
                format,
            )
        }
        TicketCommands::ResetDownload { ticket_id, by } => {
            let ticket = engine.reset_ticket_download(ticket_id, by).await?;
            output::output(&ticket, format)
        }
    }
}
